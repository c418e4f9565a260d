//! API handlers.

pub mod health;
pub mod summary;
pub mod upload;
