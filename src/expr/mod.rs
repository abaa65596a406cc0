//! Expression value model.
//!
//! [`Expr`] is a closed tagged union: exactly one variant is active and the tag
//! travels with the value. Trees are built bottom-up with the constructors in
//! [`builder`], inspected through the checked accessors in this module, and
//! handed to [`crate::protocol`] for encoding.
//!
//! Every `Expr` has exactly one owner. `Seq` children and `String` bytes are
//! owned by their parent and never shared, so a tree is always a tree.
//!
//! # Example
//!
//! ```
//! use vrtc_expr::expr::{make_int, make_seq2, make_str, ExprKind};
//!
//! let e = make_seq2(make_int(42), make_str("hi")).unwrap();
//! assert_eq!(e.kind(), ExprKind::Seq);
//! assert_eq!(e.seq_len().unwrap(), 2);
//! assert_eq!(e.to_string(), r#"[42, "hi"]"#);
//! ```

mod access;
pub mod builder;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use builder::{
    clone, free, make_bool, make_complex_float, make_complex_int, make_float, make_int,
    make_null, make_seq, make_seq1, make_seq2, make_seq3, make_seq4, make_seq_from, make_str,
    make_string, seq_add_element,
};

/// Bytes of stack that must be left before a nested `Seq` is entered.
const STACK_RED_ZONE: usize = 64 * 1024;

/// Size of each extra stack segment allocated for deep nesting.
const STACK_SEGMENT: usize = 1024 * 1024;

/// A remote-control parameter value.
///
/// Serialized externally tagged, so every encoded node carries its own tag.
/// `String` payloads are raw bytes and are encoded as a binary blob.
///
/// Nesting depth is not limited by the native call stack: drop, clone,
/// equality and display walk the tree with explicit work lists, and serde
/// grows the stack as it descends into each `Seq`.
#[derive(Debug, Serialize, Deserialize)]
pub enum Expr {
    /// No value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed 64-bit integer.
    Int(i64),
    /// IEEE 754 double.
    Float(f64),
    /// Complex integer (real, imaginary).
    ComplexInt(i64, i64),
    /// Complex double (real, imaginary).
    ComplexFloat(f64, f64),
    /// Length-prefixed byte string, not necessarily UTF-8.
    String(#[serde(with = "serde_bytes")] Vec<u8>),
    /// Ordered sequence of owned children.
    Seq(
        #[serde(
            serialize_with = "serialize_children",
            deserialize_with = "deserialize_children"
        )]
        Vec<Expr>,
    ),
}

fn serialize_children<S>(items: &[Expr], ser: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || ser.collect_seq(items))
}

fn deserialize_children<'de, D>(de: D) -> std::result::Result<Vec<Expr>, D::Error>
where
    D: Deserializer<'de>,
{
    stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || Vec::<Expr>::deserialize(de))
}

/// The tag of an [`Expr`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprKind {
    Null,
    Bool,
    Int,
    Float,
    ComplexInt,
    ComplexFloat,
    String,
    Seq,
}

impl ExprKind {
    /// Lower-case name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            ExprKind::Null => "null",
            ExprKind::Bool => "bool",
            ExprKind::Int => "int",
            ExprKind::Float => "float",
            ExprKind::ComplexInt => "complex_int",
            ExprKind::ComplexFloat => "complex_float",
            ExprKind::String => "string",
            ExprKind::Seq => "seq",
        }
    }
}

impl fmt::Display for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Drop for Expr {
    fn drop(&mut self) {
        let Expr::Seq(items) = self else {
            return;
        };
        if items.iter().all(|item| !item.is_seq()) {
            return;
        }

        // Children are moved onto a work list and emptied before they drop,
        // so each nested drop returns without descending.
        let mut pending = std::mem::take(items);
        while let Some(mut node) = pending.pop() {
            if let Expr::Seq(children) = &mut node {
                // If the work list cannot grow, `node` drops its children itself.
                if pending.try_reserve(children.len()).is_ok() {
                    pending.append(children);
                }
            }
        }
    }
}

impl Clone for Expr {
    /// Deep copy.
    ///
    /// # Panics
    ///
    /// Panics if memory is exhausted, like `Vec::clone`. Use
    /// [`Expr::try_clone`] to get `AllocationFailure` instead.
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(copy) => copy,
            Err(err) => panic!("expression clone failed: {err}"),
        }
    }
}

impl Expr {
    /// Compare two nodes that are not both `Seq`.
    fn leaf_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Expr::Null, Expr::Null) => true,
            (Expr::Bool(a), Expr::Bool(b)) => a == b,
            (Expr::Int(a), Expr::Int(b)) => a == b,
            (Expr::Float(a), Expr::Float(b)) => a.to_bits() == b.to_bits(),
            (Expr::ComplexInt(ar, ai), Expr::ComplexInt(br, bi)) => ar == br && ai == bi,
            (Expr::ComplexFloat(ar, ai), Expr::ComplexFloat(br, bi)) => {
                ar.to_bits() == br.to_bits() && ai.to_bits() == bi.to_bits()
            }
            (Expr::String(a), Expr::String(b)) => a == b,
            _ => false,
        }
    }
}

// Floats compare by bit pattern so that NaN payloads survive a round trip
// and `Expr` can be `Eq`.
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        let (Expr::Seq(xs), Expr::Seq(ys)) = (self, other) else {
            return self.leaf_eq(other);
        };
        if xs.len() != ys.len() {
            return false;
        }

        let mut pending = vec![(xs.iter(), ys.iter())];
        while let Some((xs, ys)) = pending.last_mut() {
            match (xs.next(), ys.next()) {
                (Some(Expr::Seq(a)), Some(Expr::Seq(b))) => {
                    if a.len() != b.len() {
                        return false;
                    }
                    pending.push((a.iter(), b.iter()));
                }
                (Some(a), Some(b)) => {
                    if !a.leaf_eq(b) {
                        return false;
                    }
                }
                _ => {
                    pending.pop();
                }
            }
        }
        true
    }
}

impl Eq for Expr {}

/// One step of the display walk.
enum Step<'a> {
    Node(&'a Expr),
    Text(&'static str),
}

impl Expr {
    fn fmt_leaf(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Null => f.write_str("null"),
            Expr::Bool(v) => write!(f, "{v}"),
            Expr::Int(v) => write!(f, "{v}"),
            Expr::Float(v) => write!(f, "{v:?}"),
            Expr::ComplexInt(re, im) => write!(f, "({re}{im:+}i)"),
            Expr::ComplexFloat(re, im) => write!(f, "({re:?}{im:+?}i)"),
            Expr::String(bytes) => match std::str::from_utf8(bytes) {
                Ok(text) => write!(f, "{text:?}"),
                Err(_) => {
                    f.write_str("#x\"")?;
                    for b in bytes {
                        write!(f, "{b:02x}")?;
                    }
                    f.write_str("\"")
                }
            },
            Expr::Seq(_) => f.write_str("[..]"),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pending = vec![Step::Node(self)];
        while let Some(step) = pending.pop() {
            match step {
                Step::Text(text) => f.write_str(text)?,
                Step::Node(Expr::Seq(items)) => {
                    f.write_str("[")?;
                    pending.push(Step::Text("]"));
                    for (i, item) in items.iter().enumerate().rev() {
                        pending.push(Step::Node(item));
                        if i > 0 {
                            pending.push(Step::Text(", "));
                        }
                    }
                }
                Step::Node(leaf) => leaf.fmt_leaf(f)?,
            }
        }
        Ok(())
    }
}

impl Expr {
    /// Print the readable form of this expression to stdout.
    pub fn print(&self) {
        println!("{self}");
    }
}

impl From<bool> for Expr {
    fn from(v: bool) -> Self {
        Expr::Bool(v)
    }
}

impl From<i64> for Expr {
    fn from(v: i64) -> Self {
        Expr::Int(v)
    }
}

impl From<f64> for Expr {
    fn from(v: f64) -> Self {
        Expr::Float(v)
    }
}

impl From<&str> for Expr {
    fn from(v: &str) -> Self {
        Expr::String(v.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for Expr {
    fn from(v: Vec<u8>) -> Self {
        Expr::String(v)
    }
}

impl From<Vec<Expr>> for Expr {
    fn from(v: Vec<Expr>) -> Self {
        Expr::Seq(v)
    }
}
