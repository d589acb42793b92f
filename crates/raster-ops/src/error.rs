//! Error types for raster-ops operations.
//!
//! Programmer errors (zero resize targets, zero block sizes) are panics.
//! The typed errors cover the cases driven by runtime data, such as output
//! buffers sized for the wrong channel count.
//!
//! # Dependencies
//!
//! - [`thiserror`] - derive macro for error implementations

use thiserror::Error;

/// Result type alias using [`OpsError`] as the error type.
pub type Result<T> = std::result::Result<T, OpsError>;

/// Errors that can occur during sampling and resize operations.
#[derive(Debug, Error)]
pub enum OpsError {
    /// An output slice does not match the image's channel count.
    #[error("output length mismatch: expected {expected} channels, got {got}")]
    OutputLengthMismatch {
        /// Channel count of the sampled image.
        expected: usize,
        /// Length of the supplied output slice.
        got: usize,
    },
}

impl OpsError {
    /// Creates a [`OpsError::OutputLengthMismatch`].
    #[inline]
    pub fn output_length_mismatch(expected: usize, got: usize) -> Self {
        Self::OutputLengthMismatch { expected, got }
    }
}
