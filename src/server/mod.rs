//! Server implementation
//!
//! Drives the request loop over stdio.

pub mod core;

pub use self::core::Server;
