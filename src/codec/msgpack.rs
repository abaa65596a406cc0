//! MsgPack codec using `rmp-serde`.
//!
//! Uses the compact `to_vec` form. `Expr` has no structs, so the named form
//! would add nothing but bytes to the datagram.
//!
//! Layout produced by the derived `Serialize`:
//!
//! ```text
//! Null                -> "Null"
//! Int(42)             -> { "Int": 42 }
//! ComplexInt(1, 2)    -> { "ComplexInt": [1, 2] }
//! String(b"hi")       -> { "String": bin8[2] "hi" }
//! Seq([..])           -> { "Seq": [ .. ] }
//! ```
//!
//! Integers use the smallest MsgPack integer that holds them and floats are
//! always `float 64`, so encoding is deterministic.
//!
//! Every nesting level costs at least one byte, so the decoder's depth limit
//! is raised to the datagram ceiling: any nesting that fits in a datagram
//! decodes, and only the size of the input bounds the depth.

use std::io::Cursor;

use serde::Deserialize;

use super::ExprCodec;
use crate::error::{ExprError, Result};
use crate::expr::Expr;
use crate::protocol::ABSOLUTE_MAX_DATAGRAM_SIZE;

/// MessagePack codec for expression trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackCodec;

impl ExprCodec for MsgPackCodec {
    fn name(&self) -> &'static str {
        "msgpack"
    }

    fn encode_described(&self, value: &Expr) -> Result<Vec<u8>> {
        rmp_serde::to_vec(value).map_err(|e| ExprError::EncodeInvalid(e.to_string()))
    }

    fn decode_described(&self, bytes: &[u8]) -> Result<(Expr, usize)> {
        if bytes.is_empty() {
            return Err(ExprError::DecodeMalformed("empty input".to_string()));
        }

        let mut cursor = Cursor::new(bytes);
        let value = {
            let mut de = rmp_serde::Deserializer::new(&mut cursor);
            de.set_max_depth(ABSOLUTE_MAX_DATAGRAM_SIZE);
            Expr::deserialize(&mut de).map_err(|e| ExprError::DecodeMalformed(e.to_string()))?
        };

        Ok((value, cursor.position() as usize))
    }
}
