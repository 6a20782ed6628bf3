//! Still-image encoding boundary.
//!
//! A captured hardware buffer becomes an opaque byte payload before it is
//! delivered to the delegate. An invalid buffer encodes to nothing and the
//! frame is dropped, which keeps the capture path free of error plumbing.

use super::host::FrameBuffer;

/// An encoded still image, delivered to the delegate as opaque bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct CapturedImage {
    bytes: Vec<u8>,
}

impl CapturedImage {
    /// Wraps already-encoded bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Returns the encoded bytes.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the encoded length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true for a zero-length payload.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for CapturedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapturedImage")
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Capability to encode a raw capture buffer into deliverable bytes.
pub trait StillImageEncoder: Send + Sync {
    /// Encodes a buffer, or returns `None` to drop the frame.
    fn encode(&self, buffer: &FrameBuffer) -> Option<CapturedImage>;
}

/// Binary PGM (P5) encoder for grayscale capture buffers.
///
/// Small enough to need no image crate, yet produces files any viewer
/// can open, which keeps the demo binary honest.
#[derive(Debug, Clone, Copy, Default)]
pub struct PgmEncoder;

impl PgmEncoder {
    /// Creates the encoder.
    pub fn new() -> Self {
        Self
    }
}

impl StillImageEncoder for PgmEncoder {
    fn encode(&self, buffer: &FrameBuffer) -> Option<CapturedImage> {
        if !buffer.is_valid() {
            tracing::warn!(?buffer, "Dropping inconsistent capture buffer");
            return None;
        }

        let header = format!("P5\n{} {}\n255\n", buffer.width(), buffer.height());
        let mut bytes = Vec::with_capacity(header.len() + buffer.pixels().len());
        bytes.extend_from_slice(header.as_bytes());
        bytes.extend_from_slice(buffer.pixels());

        tracing::debug!(
            width = buffer.width(),
            height = buffer.height(),
            encoded_bytes = bytes.len(),
            "Encoded still image"
        );
        Some(CapturedImage::new(bytes))
    }
}
