//! Error types for vrtc-expr.

use std::collections::TryReserveError;

use thiserror::Error;

use crate::expr::ExprKind;

/// Main error type for all expression operations.
///
/// Every failure is local to the call that produced it. Inputs consumed by
/// the failing call have already been freed when this is returned.
#[derive(Debug, Error)]
pub enum ExprError {
    /// Memory for a string, sequence or clone could not be reserved.
    #[error("Allocation failure: {0}")]
    AllocationFailure(#[from] TryReserveError),

    /// Serialized expression does not fit in the destination datagram.
    #[error("Encoded size {size} exceeds remaining datagram capacity {remaining}")]
    EncodeTooLarge { size: usize, remaining: usize },

    /// Expression cannot be represented by the codec.
    #[error("Invalid expression for encoding: {0}")]
    EncodeInvalid(String),

    /// Input bytes are truncated, mistagged or otherwise inconsistent.
    #[error("Malformed expression data: {0}")]
    DecodeMalformed(String),

    /// Typed accessor used on an expression with a different tag.
    #[error("Wrong variant: expected {expected}, found {found}")]
    WrongVariant { expected: ExprKind, found: ExprKind },

    /// Sequence index past the last element.
    #[error("Sequence index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Result type alias using ExprError.
pub type Result<T> = std::result::Result<T, ExprError>;
