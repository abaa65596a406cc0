//! JSON codec using `serde_json`.
//!
//! Same externally tagged layout as the MsgPack codec, readable in a log.
//! String payloads become arrays of byte values. JSON has no encoding for
//! NaN or infinities, so such values are refused up front rather than being
//! written as `null`.
//!
//! `serde_json`'s recursion limit is turned off; nesting is bounded by the
//! input length and the stack grows on demand in `Expr`'s `Deserialize`.

use serde_json::Deserializer;

use super::ExprCodec;
use crate::error::{ExprError, Result};
use crate::expr::Expr;

/// JSON codec for expression trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

/// Find the first non-finite float in `value`, if any.
fn find_non_finite(value: &Expr) -> Option<f64> {
    let mut pending = vec![value];
    while let Some(node) = pending.pop() {
        match node {
            Expr::Float(v) if !v.is_finite() => return Some(*v),
            Expr::ComplexFloat(re, _) if !re.is_finite() => return Some(*re),
            Expr::ComplexFloat(_, im) if !im.is_finite() => return Some(*im),
            Expr::Seq(items) => pending.extend(items.iter()),
            _ => {}
        }
    }
    None
}

impl ExprCodec for JsonCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode_described(&self, value: &Expr) -> Result<Vec<u8>> {
        if let Some(v) = find_non_finite(value) {
            return Err(ExprError::EncodeInvalid(format!(
                "JSON cannot represent float {v}"
            )));
        }
        serde_json::to_vec(value).map_err(|e| ExprError::EncodeInvalid(e.to_string()))
    }

    fn decode_described(&self, bytes: &[u8]) -> Result<(Expr, usize)> {
        let mut de = Deserializer::from_slice(bytes);
        de.disable_recursion_limit();
        let mut stream = de.into_iter::<Expr>();
        match stream.next() {
            Some(Ok(value)) => Ok((value, stream.byte_offset())),
            Some(Err(e)) => Err(ExprError::DecodeMalformed(e.to_string())),
            None => Err(ExprError::DecodeMalformed("empty input".to_string())),
        }
    }
}
