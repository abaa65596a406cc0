//! Type predicates and checked accessors.
//!
//! Predicates are total. Accessors fail with [`ExprError::WrongVariant`]
//! instead of reading the payload of another tag. Callers that want to
//! branch on the variant should `match` on [`Expr`] directly.

use super::{Expr, ExprKind};
use crate::error::{ExprError, Result};

impl Expr {
    /// Get the active tag.
    #[inline]
    pub fn kind(&self) -> ExprKind {
        match self {
            Expr::Null => ExprKind::Null,
            Expr::Bool(_) => ExprKind::Bool,
            Expr::Int(_) => ExprKind::Int,
            Expr::Float(_) => ExprKind::Float,
            Expr::ComplexInt(..) => ExprKind::ComplexInt,
            Expr::ComplexFloat(..) => ExprKind::ComplexFloat,
            Expr::String(_) => ExprKind::String,
            Expr::Seq(_) => ExprKind::Seq,
        }
    }

    /// Check if this is `Null`.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.kind() == ExprKind::Null
    }

    /// Check if this is a `Bool`.
    #[inline]
    pub fn is_bool(&self) -> bool {
        self.kind() == ExprKind::Bool
    }

    /// Check if this is an `Int`.
    #[inline]
    pub fn is_int(&self) -> bool {
        self.kind() == ExprKind::Int
    }

    /// Check if this is a `Float`.
    #[inline]
    pub fn is_float(&self) -> bool {
        self.kind() == ExprKind::Float
    }

    /// Check if this is a `ComplexInt`.
    #[inline]
    pub fn is_complex_int(&self) -> bool {
        self.kind() == ExprKind::ComplexInt
    }

    /// Check if this is a `ComplexFloat`.
    #[inline]
    pub fn is_complex_float(&self) -> bool {
        self.kind() == ExprKind::ComplexFloat
    }

    /// Check if this is a `String`.
    #[inline]
    pub fn is_string(&self) -> bool {
        self.kind() == ExprKind::String
    }

    /// Check if this is a `Seq`.
    #[inline]
    pub fn is_seq(&self) -> bool {
        self.kind() == ExprKind::Seq
    }

    pub(super) fn wrong(&self, expected: ExprKind) -> ExprError {
        ExprError::WrongVariant {
            expected,
            found: self.kind(),
        }
    }

    /// Get the payload of a `Bool`.
    pub fn get_bool(&self) -> Result<bool> {
        match self {
            Expr::Bool(v) => Ok(*v),
            _ => Err(self.wrong(ExprKind::Bool)),
        }
    }

    /// Get the payload of an `Int`.
    pub fn get_int(&self) -> Result<i64> {
        match self {
            Expr::Int(v) => Ok(*v),
            _ => Err(self.wrong(ExprKind::Int)),
        }
    }

    /// Get the payload of a `Float`.
    pub fn get_float(&self) -> Result<f64> {
        match self {
            Expr::Float(v) => Ok(*v),
            _ => Err(self.wrong(ExprKind::Float)),
        }
    }

    /// Get the `(re, im)` payload of a `ComplexInt`.
    pub fn get_complex_int(&self) -> Result<(i64, i64)> {
        match self {
            Expr::ComplexInt(re, im) => Ok((*re, *im)),
            _ => Err(self.wrong(ExprKind::ComplexInt)),
        }
    }

    /// Get the `(re, im)` payload of a `ComplexFloat`.
    pub fn get_complex_float(&self) -> Result<(f64, f64)> {
        match self {
            Expr::ComplexFloat(re, im) => Ok((*re, *im)),
            _ => Err(self.wrong(ExprKind::ComplexFloat)),
        }
    }

    /// Get the byte length of a `String`.
    pub fn string_len(&self) -> Result<usize> {
        self.string_bytes().map(<[u8]>::len)
    }

    /// Borrow the bytes of a `String`.
    pub fn string_bytes(&self) -> Result<&[u8]> {
        match self {
            Expr::String(bytes) => Ok(bytes),
            _ => Err(self.wrong(ExprKind::String)),
        }
    }

    /// Borrow the children of a `Seq`.
    pub fn as_seq(&self) -> Result<&[Expr]> {
        match self {
            Expr::Seq(items) => Ok(items),
            _ => Err(self.wrong(ExprKind::Seq)),
        }
    }

    /// Get the number of children of a `Seq`.
    pub fn seq_len(&self) -> Result<usize> {
        self.as_seq().map(<[Expr]>::len)
    }

    /// Borrow the child at `index` of a `Seq`.
    ///
    /// The child stays owned by the sequence.
    pub fn seq_ref(&self, index: usize) -> Result<&Expr> {
        let items = self.as_seq()?;
        items.get(index).ok_or(ExprError::IndexOutOfRange {
            index,
            len: items.len(),
        })
    }
}
