//! Error types for cursor configuration and stream faults.

use std::fmt;

/// Result type for cursor configuration.
pub type CursorResult<T> = Result<T, CursorError>;

/// Errors raised while configuring a cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorError {
    /// The declared property id range is empty or too wide.
    InvalidIdRange {
        /// Smallest declared id.
        min: i32,
        /// Largest declared id.
        max: i32,
    },

    /// A property id lies outside the padded descriptor table.
    PropertyOutOfRange {
        /// The rejected property id.
        id: i64,
        /// Smallest id the table holds, padding included.
        min: i64,
        /// Largest id the table holds, padding included.
        max: i64,
    },

    /// A record slot does not fit inside the record.
    SlotOutOfBounds {
        /// Record offset of the slot.
        offset: usize,
        /// Number of bytes the slot needs.
        width: usize,
        /// Size of the record.
        data_size: usize,
    },

    /// No descriptor has been declared for this id.
    UnknownProperty {
        /// The undeclared property id.
        id: i64,
    },
}

impl fmt::Display for CursorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidIdRange { min, max } => {
                write!(f, "invalid property id range [{min}, {max}]")
            }
            Self::PropertyOutOfRange { id, min, max } => {
                write!(f, "property id {id} outside descriptor table [{min}, {max}]")
            }
            Self::SlotOutOfBounds {
                offset,
                width,
                data_size,
            } => write!(
                f,
                "slot at offset {offset} ({width} bytes) exceeds record size {data_size}"
            ),
            Self::UnknownProperty { id } => write!(f, "no descriptor declared for property {id}"),
        }
    }
}

impl std::error::Error for CursorError {}

/// Structural corruption found while walking an event buffer.
///
/// A fault ends the walk for the current binding and is kept until the next
/// rebind. Framing faults force eof at once; a truncated value still lets its
/// event through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamFault {
    /// The event flag byte did not match.
    EventFlag {
        /// The byte found where the flag was expected.
        found: u8,
    },
    /// The event timestamp is not a packed integer.
    Timestamp,
    /// The event data is neither a map nor nil.
    DataMap,
    /// A property key is not a packed integer.
    Key,
    /// A property value runs past the end of the buffer.
    Value {
        /// Property id of the value.
        key: i64,
    },
}

impl fmt::Display for StreamFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EventFlag { found } => write!(f, "bad event flag 0x{found:02X}"),
            Self::Timestamp => write!(f, "undecodable event timestamp"),
            Self::DataMap => write!(f, "undecodable event data map"),
            Self::Key => write!(f, "undecodable property key"),
            Self::Value { key } => write!(f, "truncated value for property {key}"),
        }
    }
}

impl std::error::Error for StreamFault {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_invalid_range() {
        let err = CursorError::InvalidIdRange { min: 5, max: -5 };
        assert!(err.to_string().contains("[5, -5]"));
    }

    #[test]
    fn error_display_slot_out_of_bounds() {
        let err = CursorError::SlotOutOfBounds {
            offset: 60,
            width: 8,
            data_size: 64,
        };
        let msg = err.to_string();
        assert!(msg.contains("offset 60"), "should mention offset");
        assert!(msg.contains("64"), "should mention record size");
    }

    #[test]
    fn fault_display() {
        assert_eq!(
            StreamFault::EventFlag { found: 0x91 }.to_string(),
            "bad event flag 0x91"
        );
        assert!(StreamFault::Value { key: -3 }.to_string().contains("-3"));
    }
}
