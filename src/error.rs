//! Error types for display operations
//!
//! Only two conditions ever fail a display call: an unknown mode id and a
//! colour index outside the active mode's colour depth. Drawing primitives
//! clip and substitute instead of failing.

use thiserror::Error;

/// Display error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DisplayError {
    /// Mode id is not one of the supported modes
    #[error("Invalid mode: {0} (supported modes are 40 and 80)")]
    InvalidMode(u16),

    /// Colour or palette index outside the valid range
    #[error("Index {index} out of range (must be below {limit})")]
    IndexOutOfRange { index: usize, limit: usize },
}

/// Result type for display operations
pub type Result<T> = std::result::Result<T, DisplayError>;
