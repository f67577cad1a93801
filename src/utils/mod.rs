//! Utility functions
//!
//! Provides logging setup and the injectable event log.

pub mod logging;

pub use logging::{EventLog, LogFacade, MemoryLog, setup_logging};
