//! Error types for element codec operations.

use std::fmt;

use crate::tag::ElementKind;

/// Result type for element codec operations.
pub type PackResult<T> = Result<T, PackError>;

/// Errors that can occur while packing or unpacking an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackError {
    /// The element is truncated: its header or payload runs past the buffer.
    UnexpectedEof {
        /// Number of bytes the element needs.
        requested: usize,
        /// Number of bytes available.
        available: usize,
    },

    /// The element at this position is not of the requested kind.
    TypeMismatch {
        /// The kind the caller asked for.
        expected: ElementKind,
        /// The tag byte found in the buffer (0 for an empty buffer).
        found: u8,
    },

    /// The output buffer is too small to hold the packed element.
    BufferTooSmall {
        /// Number of bytes required.
        needed: usize,
        /// Number of bytes available.
        available: usize,
    },

    /// A raw length or container count does not fit the 32-bit header.
    LengthOverflow {
        /// The length that was requested.
        length: usize,
    },
}

impl PackError {
    /// Returns `true` if the error only means "not this kind".
    #[must_use]
    pub const fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }
}

impl fmt::Display for PackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof {
                requested,
                available,
            } => {
                write!(
                    f,
                    "element needs {requested} bytes but only {available} bytes available"
                )
            }
            Self::TypeMismatch { expected, found } => {
                write!(f, "expected {expected} element, found tag 0x{found:02X}")
            }
            Self::BufferTooSmall { needed, available } => {
                write!(f, "buffer too small: need {needed} bytes, have {available}")
            }
            Self::LengthOverflow { length } => {
                write!(f, "length {length} does not fit a 32-bit element header")
            }
        }
    }
}

impl std::error::Error for PackError {}
