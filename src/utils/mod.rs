//! Utility functions and types for the analytics toolkit.

pub mod error;
pub mod fs;
mod logging;
pub mod types;

pub use error::Error;
pub use logging::init_logging;
pub use types::*;
