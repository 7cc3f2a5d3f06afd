//! HTTP handlers for the user directory.

pub mod health;
pub mod users;
