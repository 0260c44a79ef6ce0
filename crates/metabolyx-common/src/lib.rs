//! metabolyx-common - Shared types and errors used across all Metabolyx crates.

pub mod error;
pub mod status;

// Re-export commonly used types
pub use error::{MetabolyxError, Result};
pub use status::{Direction, ReadingStatus};
