//! Error handling
//!
//! Defines error types and their external classification.

pub mod handlers;
pub mod types;

pub use types::*;
