//! # vrtc-expr
//!
//! Expression values for a remote command/control protocol.
//!
//! A controller sends structured parameter values (numbers, strings, nested
//! sequences) to a controlled device in size-limited datagrams. This crate
//! provides the value type and its wire form:
//!
//! - [`expr`] - the [`Expr`] tagged union, constructors with atomic failure
//!   semantics, deep clone/free, and checked accessors
//! - [`codec`] - byte-level codecs behind the [`codec::ExprCodec`] trait
//! - [`protocol`] - the bounded [`DatagramBuffer`] and the encode/decode adapter
//!
//! ## Example
//!
//! ```
//! use vrtc_expr::expr::{make_bool, make_int, make_seq1, make_seq3, make_str};
//! use vrtc_expr::protocol::{decode, encode, DatagramBuffer};
//!
//! let value = make_seq3(make_int(42), make_str("hi"), make_seq1(make_bool(true))).unwrap();
//!
//! let mut datagram = DatagramBuffer::new();
//! encode(&value, &mut datagram).unwrap();
//!
//! let decoded = decode(datagram.as_slice()).unwrap();
//! assert_eq!(decoded.expr, value);
//! ```

pub mod codec;
pub mod error;
pub mod expr;
pub mod protocol;

pub use error::{ExprError, Result};
pub use expr::{Expr, ExprKind};
pub use protocol::DatagramBuffer;
