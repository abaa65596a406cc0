//! Bounded output buffer for one datagram.
//!
//! Uses `bytes::BytesMut` for storage. The buffer never grows past its
//! maximum size: [`DatagramBuffer::append`] either writes all of its input or
//! nothing, so a receiver never sees a partial write.
//!
//! # Example
//!
//! ```
//! use vrtc_expr::protocol::DatagramBuffer;
//!
//! let mut buf = DatagramBuffer::with_max_size(4);
//! buf.append(b"abc").unwrap();
//! assert_eq!(buf.remaining(), 1);
//! assert!(buf.append(b"de").is_err());
//! assert_eq!(buf.as_slice(), b"abc");
//! ```

use bytes::{Bytes, BytesMut};

use super::{ABSOLUTE_MAX_DATAGRAM_SIZE, DEFAULT_MAX_DATAGRAM_SIZE};
use crate::error::{ExprError, Result};

/// Caller-owned datagram under construction.
#[derive(Debug, Clone)]
pub struct DatagramBuffer {
    /// Bytes written so far.
    buffer: BytesMut,
    /// Hard ceiling on `buffer.len()`.
    max_size: usize,
}

impl DatagramBuffer {
    /// Create an empty buffer with the default datagram ceiling.
    pub fn new() -> Self {
        Self::with_max_size(DEFAULT_MAX_DATAGRAM_SIZE)
    }

    /// Create an empty buffer with a custom ceiling.
    ///
    /// The ceiling is clamped to `ABSOLUTE_MAX_DATAGRAM_SIZE`.
    pub fn with_max_size(max_size: usize) -> Self {
        let max_size = max_size.min(ABSOLUTE_MAX_DATAGRAM_SIZE);
        Self {
            buffer: BytesMut::with_capacity(max_size),
            max_size,
        }
    }

    /// Get the ceiling.
    #[inline]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Get the number of bytes written.
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if nothing has been written.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Get the number of bytes that can still be appended.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.max_size - self.buffer.len()
    }

    /// Append `data` in full.
    ///
    /// # Errors
    ///
    /// Returns `EncodeTooLarge` if `data` does not fit; the buffer is unchanged.
    pub fn append(&mut self, data: &[u8]) -> Result<()> {
        let remaining = self.remaining();
        if data.len() > remaining {
            return Err(ExprError::EncodeTooLarge {
                size: data.len(),
                remaining,
            });
        }
        self.buffer.extend_from_slice(data);
        Ok(())
    }

    /// Borrow the bytes written so far.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Discard everything written.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Take the written bytes for sending, leaving the buffer empty.
    ///
    /// The ceiling is kept, so the buffer can be reused for the next datagram.
    pub fn freeze(&mut self) -> Bytes {
        self.buffer.split().freeze()
    }
}

impl Default for DatagramBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<[u8]> for DatagramBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ceiling() {
        let buf = DatagramBuffer::new();
        assert_eq!(buf.max_size(), DEFAULT_MAX_DATAGRAM_SIZE);
        assert_eq!(buf.remaining(), DEFAULT_MAX_DATAGRAM_SIZE);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_ceiling_is_clamped() {
        let buf = DatagramBuffer::with_max_size(usize::MAX);
        assert_eq!(buf.max_size(), ABSOLUTE_MAX_DATAGRAM_SIZE);
    }

    #[test]
    fn test_append_exactly_fills() {
        let mut buf = DatagramBuffer::with_max_size(5);
        buf.append(b"hel").unwrap();
        buf.append(b"lo").unwrap();
        assert_eq!(buf.remaining(), 0);
        assert_eq!(buf.as_slice(), b"hello");
        buf.append(b"").unwrap();
    }

    #[test]
    fn test_append_overflow_leaves_buffer_unchanged() {
        let mut buf = DatagramBuffer::with_max_size(5);
        buf.append(b"abc").unwrap();

        match buf.append(b"xyz").unwrap_err() {
            ExprError::EncodeTooLarge { size, remaining } => {
                assert_eq!(size, 3);
                assert_eq!(remaining, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.as_slice(), b"abc");
    }

    #[test]
    fn test_freeze_resets_for_reuse() {
        let mut buf = DatagramBuffer::with_max_size(8);
        buf.append(b"first").unwrap();

        let sent = buf.freeze();
        assert_eq!(&sent[..], b"first");
        assert!(buf.is_empty());
        assert_eq!(buf.remaining(), 8);

        buf.append(b"second").unwrap();
        assert_eq!(buf.as_ref(), b"second");
    }

    #[test]
    fn test_clear() {
        let mut buf = DatagramBuffer::with_max_size(8);
        buf.append(b"data").unwrap();
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.remaining(), 8);
    }
}
