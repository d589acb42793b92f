//! Ordered decoder fallback.
//!
//! A [`DecoderChain`] tries its backends in registration order. A backend
//! that declines the header (`can_decode` false) is skipped silently; a
//! backend that accepts but then fails is logged at debug level and
//! swallowed, and the next backend gets its chance. Only the failure of the
//! last candidate surfaces to the caller, so one misbehaving backend cannot
//! mask a working one registered after it.

use tracing::debug;

use crate::error::{IoError, Result};
use crate::info::{DecodedImage, FileInfo, SampleKind};
use crate::traits::PixelDecoder;

/// An ordered collection of decoding backends with fallback semantics.
///
/// # Example
///
/// ```rust
/// use raster_io::{DecoderChain, raw::RawCodec, SampleKind};
///
/// let mut chain = DecoderChain::new();
/// chain.register(Box::new(RawCodec));
/// assert_eq!(chain.len(), 1);
/// ```
#[derive(Default)]
pub struct DecoderChain {
    decoders: Vec<Box<dyn PixelDecoder>>,
}

impl DecoderChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a backend. Earlier registrations are tried first.
    pub fn register(&mut self, decoder: Box<dyn PixelDecoder>) {
        self.decoders.push(decoder);
    }

    /// Number of registered backends.
    #[inline]
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    /// Whether the chain has no backends.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Probes metadata through the first backend that succeeds.
    pub fn probe(&self, bytes: &[u8]) -> Result<FileInfo> {
        self.try_each(bytes, |decoder| decoder.probe(bytes))
    }

    /// Decodes through the first backend that succeeds.
    pub fn decode(&self, bytes: &[u8], kind: SampleKind) -> Result<DecodedImage> {
        self.try_each(bytes, |decoder| decoder.decode(bytes, kind))
    }

    fn try_each<R>(
        &self,
        bytes: &[u8],
        mut attempt: impl FnMut(&dyn PixelDecoder) -> Result<R>,
    ) -> Result<R> {
        let mut last_error = None;
        for decoder in &self.decoders {
            if !decoder.can_decode(bytes) {
                continue;
            }
            match attempt(decoder.as_ref()) {
                Ok(result) => return Ok(result),
                Err(err) => {
                    debug!(decoder = decoder.name(), error = %err, "decoder failed, trying next");
                    last_error = Some(err);
                }
            }
        }
        Err(last_error.unwrap_or(IoError::UnrecognizedFormat))
    }
}

impl std::fmt::Debug for DecoderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.decoders.iter().map(|d| d.name()).collect();
        f.debug_struct("DecoderChain").field("decoders", &names).finish()
    }
}
