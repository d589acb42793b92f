//! Error types for raster-io operations.
//!
//! Backend failures are values, not panics: a corrupt file is a normal
//! runtime outcome. [`IoError`] is the single error type every
//! [`PixelDecoder`](crate::PixelDecoder) and
//! [`PixelEncoder`](crate::PixelEncoder) reports through.
//!
//! # Dependencies
//!
//! - [`thiserror`] - derive macro for error implementations

use thiserror::Error;

/// Result type alias using [`IoError`] as the error type.
pub type Result<T> = std::result::Result<T, IoError>;

/// Errors that can occur while probing, decoding or encoding pixel data.
#[derive(Debug, Error)]
pub enum IoError {
    /// The header bytes do not form a valid header for this backend.
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    /// The payload ends before the header-declared pixel data does.
    #[error("truncated data: expected {expected} bytes, got {got}")]
    TruncatedData {
        /// Byte count the header promises.
        expected: usize,
        /// Byte count actually present.
        got: usize,
    },

    /// The image layout (channel count, component type, color space) is not
    /// representable by this backend.
    #[error("unsupported layout: {0}")]
    UnsupportedLayout(String),

    /// No backend in a chain recognized the data.
    #[error("unrecognized format: no decoder accepted the header")]
    UnrecognizedFormat,

    /// Underlying I/O failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure propagated from core image construction.
    #[error(transparent)]
    Core(#[from] raster_core::Error),
}

impl IoError {
    /// Creates a [`IoError::MalformedHeader`].
    #[inline]
    pub fn malformed_header(msg: impl Into<String>) -> Self {
        Self::MalformedHeader(msg.into())
    }

    /// Creates a [`IoError::TruncatedData`].
    #[inline]
    pub fn truncated_data(expected: usize, got: usize) -> Self {
        Self::TruncatedData { expected, got }
    }

    /// Creates a [`IoError::UnsupportedLayout`].
    #[inline]
    pub fn unsupported_layout(msg: impl Into<String>) -> Self {
        Self::UnsupportedLayout(msg.into())
    }
}
