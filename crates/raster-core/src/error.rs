//! Error types for raster-core operations.
//!
//! Programmer errors (zero dimensions, out-of-range unchecked access,
//! requesting an unresolvable alpha inference) are panics, not values of
//! [`Error`]. The typed errors here cover the recoverable cases: adopting a
//! buffer of the wrong length, operating on mismatched images, and failures
//! propagated from pluggable backends.
//!
//! # Dependencies
//!
//! - [`thiserror`] - derive macro for error implementations

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during pixel buffer operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A supplied buffer does not match the expected element count.
    #[error("buffer length mismatch: expected {expected} elements, got {got}")]
    BufferLengthMismatch {
        /// Element count required by the dimensions.
        expected: usize,
        /// Element count actually supplied.
        got: usize,
    },

    /// Two images that must agree in size do not.
    #[error("dimension mismatch: {a_width}x{a_height} vs {b_width}x{b_height}")]
    DimensionMismatch {
        /// First image width.
        a_width: u32,
        /// First image height.
        a_height: u32,
        /// Second image width.
        b_width: u32,
        /// Second image height.
        b_height: u32,
    },

    /// Channel count is unsupported for the requested operation.
    #[error("channel mismatch: expected {expected} channels, got {got}")]
    ChannelMismatch {
        /// Expected channel count.
        expected: u32,
        /// Actual channel count.
        got: u32,
    },

    /// Generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Creates a [`Error::BufferLengthMismatch`].
    #[inline]
    pub fn buffer_length_mismatch(expected: usize, got: usize) -> Self {
        Self::BufferLengthMismatch { expected, got }
    }

    /// Creates a [`Error::DimensionMismatch`].
    #[inline]
    pub fn dimension_mismatch(a: (u32, u32), b: (u32, u32)) -> Self {
        Self::DimensionMismatch {
            a_width: a.0,
            a_height: a.1,
            b_width: b.0,
            b_height: b.1,
        }
    }

    /// Creates a [`Error::ChannelMismatch`].
    #[inline]
    pub fn channel_mismatch(expected: u32, got: u32) -> Self {
        Self::ChannelMismatch { expected, got }
    }

    /// Creates a [`Error::Other`].
    #[inline]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
