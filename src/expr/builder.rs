//! Constructors and ownership operations.
//!
//! All constructors return `Result<Expr>` and never a partially built value.
//! Multi-argument constructors take `Result<Expr>` arguments so a failed
//! sub-expression can be passed straight in:
//!
//! ```
//! use vrtc_expr::expr::{make_int, make_seq2, seq_add_element, make_bool};
//! use vrtc_expr::ExprError;
//!
//! // A failed argument fails the whole call; the other argument is freed here.
//! let bad = seq_add_element(make_bool(true).unwrap(), make_int(1).unwrap());
//! let result = make_seq2(make_int(7), bad);
//! assert!(matches!(result, Err(ExprError::WrongVariant { .. })));
//! ```
//!
//! # Ownership
//!
//! Consuming operations take their inputs by value. On success the inputs are
//! owned by the result; on failure they have already been freed, so a caller
//! never cleans up after a failed call and can never reuse a moved handle.

use tracing::{trace, warn};

use super::{Expr, ExprKind};
use crate::error::Result;

/// Make a `Null` expression.
#[inline]
pub fn make_null() -> Result<Expr> {
    Ok(Expr::Null)
}

/// Make a `Bool` expression.
#[inline]
pub fn make_bool(v: bool) -> Result<Expr> {
    Ok(Expr::Bool(v))
}

/// Make an `Int` expression.
#[inline]
pub fn make_int(v: i64) -> Result<Expr> {
    Ok(Expr::Int(v))
}

/// Make a `Float` expression.
#[inline]
pub fn make_float(v: f64) -> Result<Expr> {
    Ok(Expr::Float(v))
}

/// Make a `ComplexInt` expression.
#[inline]
pub fn make_complex_int(re: i64, im: i64) -> Result<Expr> {
    Ok(Expr::ComplexInt(re, im))
}

/// Make a `ComplexFloat` expression.
#[inline]
pub fn make_complex_float(re: f64, im: f64) -> Result<Expr> {
    Ok(Expr::ComplexFloat(re, im))
}

/// Make a `String` expression holding a copy of `bytes`.
///
/// Zero-length input is valid.
///
/// # Errors
///
/// Returns `AllocationFailure` if the copy cannot be allocated.
pub fn make_string(bytes: &[u8]) -> Result<Expr> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(bytes.len())?;
    buf.extend_from_slice(bytes);
    Ok(Expr::String(buf))
}

/// Make a `String` expression from text.
#[inline]
pub fn make_str(text: &str) -> Result<Expr> {
    make_string(text.as_bytes())
}

/// Make an empty `Seq`, to be grown with [`seq_add_element`].
#[inline]
pub fn make_seq() -> Result<Expr> {
    Ok(Expr::Seq(Vec::new()))
}

/// Make a `Seq` from any number of possibly-failed elements.
///
/// If any element is an `Err`, or the sequence cannot be allocated, every
/// `Ok` element is freed and the first error is returned.
pub fn make_seq_from<I>(elements: I) -> Result<Expr>
where
    I: IntoIterator<Item = Result<Expr>>,
{
    let elements = elements.into_iter();
    let mut items = Vec::new();
    items.try_reserve_exact(elements.size_hint().0)?;

    for (index, element) in elements.enumerate() {
        match element {
            Ok(e) => {
                items.try_reserve(1)?;
                items.push(e);
            }
            Err(err) => {
                warn!(index, error = %err, "sequence element failed, freeing siblings");
                return Err(err);
            }
        }
    }

    Ok(Expr::Seq(items))
}

/// Make a `Seq` with one element. See [`make_seq_from`] for failure rules.
#[inline]
pub fn make_seq1(x0: Result<Expr>) -> Result<Expr> {
    make_seq_from([x0])
}

/// Make a `Seq` with two elements. See [`make_seq_from`] for failure rules.
#[inline]
pub fn make_seq2(x0: Result<Expr>, x1: Result<Expr>) -> Result<Expr> {
    make_seq_from([x0, x1])
}

/// Make a `Seq` with three elements. See [`make_seq_from`] for failure rules.
#[inline]
pub fn make_seq3(x0: Result<Expr>, x1: Result<Expr>, x2: Result<Expr>) -> Result<Expr> {
    make_seq_from([x0, x1, x2])
}

/// Make a `Seq` with four elements. See [`make_seq_from`] for failure rules.
#[inline]
pub fn make_seq4(
    x0: Result<Expr>,
    x1: Result<Expr>,
    x2: Result<Expr>,
    x3: Result<Expr>,
) -> Result<Expr> {
    make_seq_from([x0, x1, x2, x3])
}

/// Append `element` to `seq` and return the grown sequence.
///
/// # Errors
///
/// Returns `WrongVariant` if `seq` is not a `Seq`, or `AllocationFailure` if
/// it cannot grow. In both cases `seq` and `element` are freed.
pub fn seq_add_element(seq: Expr, element: Expr) -> Result<Expr> {
    let mut seq = seq;
    if let Err(err) = seq.push(element) {
        warn!(error = %err, "seq_add_element failed, freeing sequence and element");
        return Err(err);
    }
    Ok(seq)
}

/// Deep-copy `x`. The original is left untouched.
#[inline]
pub fn clone(x: &Expr) -> Result<Expr> {
    x.try_clone()
}

/// Deep-free `x`. `None` is a no-op.
///
/// Dropping an `Expr` already releases its whole tree without recursion;
/// this is the explicit form for call sites that want it spelled out.
pub fn free(x: Option<Expr>) {
    if let Some(root) = x {
        trace!(kind = %root.kind(), "freeing expression");
        drop(root);
    }
}

/// Reserve room for exactly `len` elements.
fn reserved<T>(len: usize) -> Result<Vec<T>> {
    let mut items = Vec::new();
    items.try_reserve_exact(len)?;
    Ok(items)
}

impl Expr {
    /// Append `element` to this `Seq` in place.
    ///
    /// On failure `element` is freed and `self` is unchanged.
    pub fn push(&mut self, element: Expr) -> Result<()> {
        match self {
            Expr::Seq(items) => {
                items.try_reserve(1)?;
                items.push(element);
                Ok(())
            }
            _ => Err(self.wrong(ExprKind::Seq)),
        }
    }

    /// Deep-copy with fallible allocation.
    ///
    /// Unlike [`Clone::clone`], allocation exhaustion is reported as
    /// `AllocationFailure` instead of panicking. Sequences are copied with an
    /// explicit work list, so any depth that can be built can be cloned.
    pub fn try_clone(&self) -> Result<Expr> {
        let Expr::Seq(root) = self else {
            return self.clone_leaf();
        };

        // Each frame pairs the source children still to copy with the
        // copies made so far; the destination is reserved to its final length.
        let mut parents = Vec::new();
        let mut current = (root.iter(), reserved(root.len())?);
        loop {
            match current.0.next() {
                Some(Expr::Seq(items)) => {
                    let child = (items.iter(), reserved(items.len())?);
                    parents.try_reserve(1)?;
                    parents.push(std::mem::replace(&mut current, child));
                }
                Some(leaf) => current.1.push(leaf.clone_leaf()?),
                None => {
                    let finished = Expr::Seq(std::mem::take(&mut current.1));
                    match parents.pop() {
                        Some(parent) => {
                            current = parent;
                            current.1.push(finished);
                        }
                        None => return Ok(finished),
                    }
                }
            }
        }
    }

    /// Copy a node without its children.
    fn clone_leaf(&self) -> Result<Expr> {
        let copy = match self {
            Expr::Null => Expr::Null,
            Expr::Bool(v) => Expr::Bool(*v),
            Expr::Int(v) => Expr::Int(*v),
            Expr::Float(v) => Expr::Float(*v),
            Expr::ComplexInt(re, im) => Expr::ComplexInt(*re, *im),
            Expr::ComplexFloat(re, im) => Expr::ComplexFloat(*re, *im),
            Expr::String(bytes) => return make_string(bytes),
            Expr::Seq(_) => Expr::Seq(Vec::new()),
        };
        Ok(copy)
    }
}
