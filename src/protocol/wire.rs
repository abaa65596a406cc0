//! Expression encode/decode against a bounded datagram.
//!
//! [`Wire`] pairs an [`ExprCodec`] with the datagram size rules:
//!
//! - `encode` serializes to a scratch vector first and appends only if the
//!   whole encoding fits, so a failed encode never leaves a partial write.
//! - `encode_and_free` does the same and frees the value either way.
//! - `decode` accepts exactly one complete expression; empty, truncated or
//!   over-long input is `DecodeMalformed`.
//!
//! # Example
//!
//! ```
//! use vrtc_expr::expr::{make_int, make_seq2, make_str};
//! use vrtc_expr::protocol::{decode, encode_and_free, DatagramBuffer};
//!
//! let mut buf = DatagramBuffer::new();
//! encode_and_free(make_seq2(make_int(42), make_str("hi")).unwrap(), &mut buf).unwrap();
//!
//! let decoded = decode(buf.as_slice()).unwrap();
//! assert_eq!(decoded.consumed, buf.len());
//! assert_eq!(decoded.expr.seq_ref(0).unwrap().get_int().unwrap(), 42);
//! ```

use tracing::{debug, warn};

use super::DatagramBuffer;
use crate::codec::{ExprCodec, MsgPackCodec};
use crate::error::{ExprError, Result};
use crate::expr::{free, Expr};

/// A decoded expression and the number of input bytes it occupied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// Freshly owned expression tree.
    pub expr: Expr,
    /// Bytes consumed from the input.
    pub consumed: usize,
}

/// Wire adapter over a codec. Holds no session state.
#[derive(Debug, Clone, Default)]
pub struct Wire<C = MsgPackCodec> {
    codec: C,
}

impl<C: ExprCodec> Wire<C> {
    /// Create an adapter using `codec`.
    pub fn new(codec: C) -> Self {
        Self { codec }
    }

    /// Get the codec.
    #[inline]
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Encode `value` into `dest`. The caller keeps `value`.
    ///
    /// # Errors
    ///
    /// - `EncodeInvalid` if the codec refuses the value
    /// - `EncodeTooLarge` if the encoding exceeds `dest.remaining()`
    ///
    /// On error `dest` is unchanged.
    pub fn encode(&self, value: &Expr, dest: &mut DatagramBuffer) -> Result<()> {
        let bytes = self.codec.encode_described(value).inspect_err(|e| {
            warn!(codec = self.codec.name(), error = %e, "expression rejected by codec");
        })?;

        dest.append(&bytes).inspect_err(|e| {
            warn!(codec = self.codec.name(), error = %e, "expression does not fit datagram");
        })?;

        debug!(
            codec = self.codec.name(),
            size = bytes.len(),
            remaining = dest.remaining(),
            "encoded expression"
        );
        Ok(())
    }

    /// Encode `value` into `dest`, then free `value` whether or not encoding
    /// succeeded.
    pub fn encode_and_free(&self, value: Expr, dest: &mut DatagramBuffer) -> Result<()> {
        let result = self.encode(&value, dest);
        free(Some(value));
        result
    }

    /// Decode exactly one expression from `bytes`.
    ///
    /// # Errors
    ///
    /// Returns `DecodeMalformed` if `bytes` is empty, malformed, truncated, or
    /// has bytes left over after the expression.
    pub fn decode(&self, bytes: &[u8]) -> Result<Decoded> {
        let (expr, consumed) = self.codec.decode_described(bytes).inspect_err(|e| {
            warn!(codec = self.codec.name(), len = bytes.len(), error = %e, "dropping malformed expression");
        })?;

        if consumed != bytes.len() {
            free(Some(expr));
            let trailing = bytes.len() - consumed;
            warn!(codec = self.codec.name(), trailing, "dropping expression with trailing bytes");
            return Err(ExprError::DecodeMalformed(format!(
                "{trailing} trailing bytes after expression"
            )));
        }

        debug!(codec = self.codec.name(), size = consumed, "decoded expression");
        Ok(Decoded { expr, consumed })
    }
}

/// Encode `value` into `dest` with the default MsgPack codec.
#[inline]
pub fn encode(value: &Expr, dest: &mut DatagramBuffer) -> Result<()> {
    Wire::<MsgPackCodec>::default().encode(value, dest)
}

/// Encode and free `value` with the default MsgPack codec.
#[inline]
pub fn encode_and_free(value: Expr, dest: &mut DatagramBuffer) -> Result<()> {
    Wire::<MsgPackCodec>::default().encode_and_free(value, dest)
}

/// Decode one expression with the default MsgPack codec.
#[inline]
pub fn decode(bytes: &[u8]) -> Result<Decoded> {
    Wire::<MsgPackCodec>::default().decode(bytes)
}
