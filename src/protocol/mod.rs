//! Protocol module - datagram sizing and the expression wire adapter.
//!
//! This module implements the datagram side of the data plane:
//! - Bounded datagram buffer that never truncates
//! - Encode/decode of one expression per call, through a pluggable codec

mod datagram_buffer;
mod wire;

pub use datagram_buffer::DatagramBuffer;
pub use wire::{decode, encode, encode_and_free, Decoded, Wire};

/// Default datagram ceiling: UDP payload of a 1500-byte Ethernet MTU.
pub const DEFAULT_MAX_DATAGRAM_SIZE: usize = 1472;

/// Absolute datagram ceiling: largest UDP payload over IPv4.
pub const ABSOLUTE_MAX_DATAGRAM_SIZE: usize = 65_507;
