//! API Routes
//!
//! Route handlers organized by functionality.

pub mod connection;
pub mod credential;
pub mod health;
