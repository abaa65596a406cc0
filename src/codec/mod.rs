//! Codec module - byte-level encoding of expression trees.
//!
//! The wire adapter in [`crate::protocol`] does not know how bytes are laid
//! out. It talks to an [`ExprCodec`], which turns a described value into
//! bytes and back:
//!
//! - [`MsgPackCodec`] - compact MessagePack using `rmp-serde` (the default)
//! - [`JsonCodec`] - readable JSON using `serde_json`, for diagnostics and tests
//!
//! Both use the externally tagged layout derived for [`Expr`], so every node
//! carries its own tag and no schema is needed to parse it.
//!
//! # Example
//!
//! ```
//! use vrtc_expr::codec::{ExprCodec, MsgPackCodec};
//! use vrtc_expr::Expr;
//!
//! let value = Expr::Seq(vec![Expr::Int(1), Expr::from("a")]);
//! let bytes = MsgPackCodec.encode_described(&value).unwrap();
//! let (decoded, consumed) = MsgPackCodec.decode_described(&bytes).unwrap();
//! assert_eq!(decoded, value);
//! assert_eq!(consumed, bytes.len());
//! ```

mod json;
mod msgpack;

pub use json::JsonCodec;
pub use msgpack::MsgPackCodec;

use crate::error::Result;
use crate::expr::Expr;

/// Binary codec collaborator used by the wire adapter.
///
/// Implementations must be deterministic: the same logical value always
/// encodes to the same bytes.
pub trait ExprCodec {
    /// Short codec name for diagnostics.
    fn name(&self) -> &'static str;

    /// Encode one expression tree.
    ///
    /// # Errors
    ///
    /// Returns `EncodeInvalid` if the value cannot be represented.
    fn encode_described(&self, value: &Expr) -> Result<Vec<u8>>;

    /// Decode the first complete expression in `bytes`.
    ///
    /// Returns the value and the number of bytes it occupied. Bytes after the
    /// value are left unread.
    ///
    /// # Errors
    ///
    /// Returns `DecodeMalformed` on empty, truncated or mistagged input.
    fn decode_described(&self, bytes: &[u8]) -> Result<(Expr, usize)>;
}

impl<C: ExprCodec + ?Sized> ExprCodec for &C {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn encode_described(&self, value: &Expr) -> Result<Vec<u8>> {
        (**self).encode_described(value)
    }

    fn decode_described(&self, bytes: &[u8]) -> Result<(Expr, usize)> {
        (**self).decode_described(bytes)
    }
}
