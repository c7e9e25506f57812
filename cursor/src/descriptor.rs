//! Property descriptors and the biased dispatch table.

use std::fmt;

use tracing::debug;

use crate::error::{CursorError, CursorResult};
use crate::record::{Record, StrView, BOOL_WIDTH, DOUBLE_WIDTH, INT_WIDTH, STR_VIEW_WIDTH};

/// Extra descriptor slots on each side of the declared id range.
pub const DESCRIPTOR_PADDING: i64 = 32;

/// Widest id range a table will allocate.
pub const MAX_PROPERTY_SPAN: i64 = 1 << 20;

/// How a property value is decoded into the record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ValueKind {
    /// Zero-copy byte string view.
    String,
    /// 32-bit signed integer (64-bit values are truncated).
    Integer,
    /// IEEE754 double.
    Float,
    Boolean,
    /// Measured and skipped; nothing is written.
    #[default]
    Noop,
}

impl ValueKind {
    /// Maps a host kind name to a value kind.
    ///
    /// `"factor"` is an alias for `"integer"` and the empty name declares a
    /// skipped property. Unknown names fall back to boolean.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "" => Self::Noop,
            "string" => Self::String,
            "integer" | "factor" => Self::Integer,
            "float" => Self::Float,
            "boolean" => Self::Boolean,
            other => {
                debug!(kind = other, "unknown property kind, decoding as boolean");
                Self::Boolean
            }
        }
    }

    /// Number of record bytes the kind writes.
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::String => STR_VIEW_WIDTH,
            Self::Integer => INT_WIDTH,
            Self::Float => DOUBLE_WIDTH,
            Self::Boolean => BOOL_WIDTH,
            Self::Noop => 0,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Noop => "",
        };
        f.write_str(name)
    }
}

/// Binds one property id to a record offset and a value kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub offset: usize,
    pub kind: ValueKind,
    declared: bool,
}

impl PropertyDescriptor {
    #[must_use]
    pub const fn new(offset: usize, kind: ValueKind) -> Self {
        Self {
            offset,
            kind,
            declared: true,
        }
    }

    /// Returns `true` if the descriptor was installed by `set_property`.
    #[must_use]
    pub const fn is_declared(&self) -> bool {
        self.declared
    }

    /// Decodes the element at `buf[pos..]` into the record.
    ///
    /// Returns the element size, or `None` if the element is not of this
    /// descriptor's kind. String views refer to `pos`-relative offsets of
    /// `buf`, so `buf` must be the whole bound buffer.
    #[allow(clippy::cast_possible_truncation)]
    pub fn set(&self, record: &mut Record, buf: &[u8], pos: usize) -> Option<usize> {
        let elem = buf.get(pos..)?;
        match self.kind {
            ValueKind::Noop => minipack::sizeof_elem_and_data(elem).ok(),
            ValueKind::String => {
                let (payload, size) = minipack::unpack_raw_bytes(elem).ok()?;
                let view = StrView::new(pos + size - payload.len(), payload.len())?;
                record.write_str_view(self.offset, view);
                Some(size)
            }
            ValueKind::Integer => {
                let (value, size) = minipack::unpack_int(elem).ok()?;
                record.write_i32(self.offset, value as i32);
                Some(size)
            }
            ValueKind::Float => {
                let (value, size) = minipack::unpack_double(elem).ok()?;
                record.write_f64(self.offset, value);
                Some(size)
            }
            ValueKind::Boolean => {
                let (value, size) = minipack::unpack_bool(elem).ok()?;
                record.write_bool(self.offset, value);
                Some(size)
            }
        }
    }

    /// Writes the kind's cleared value (empty, zero or false).
    pub fn clear(&self, record: &mut Record) {
        match self.kind {
            ValueKind::Noop => {}
            ValueKind::String => record.write_str_view(self.offset, StrView::default()),
            ValueKind::Integer => record.write_i32(self.offset, 0),
            ValueKind::Float => record.write_f64(self.offset, 0.0),
            ValueKind::Boolean => record.write_bool(self.offset, false),
        }
    }
}

/// Dense descriptor array indexed by `id - base`.
///
/// The table spans the declared range plus [`DESCRIPTOR_PADDING`] slots on
/// each side. Every slot starts as an undeclared no-op, and ids outside the
/// table resolve to the same no-op.
#[derive(Debug, Clone)]
pub struct DescriptorTable {
    min_id: i32,
    max_id: i32,
    base: i64,
    slots: Vec<PropertyDescriptor>,
}

const NOOP: PropertyDescriptor = PropertyDescriptor {
    offset: 0,
    kind: ValueKind::Noop,
    declared: false,
};

impl DescriptorTable {
    /// Allocates a table for ids in `[min_id, max_id]`.
    pub fn new(min_id: i32, max_id: i32) -> CursorResult<Self> {
        let span = i64::from(max_id) - i64::from(min_id);
        if !(0..=MAX_PROPERTY_SPAN).contains(&span) {
            return Err(CursorError::InvalidIdRange {
                min: min_id,
                max: max_id,
            });
        }
        let len = usize::try_from(span + 2 * DESCRIPTOR_PADDING + 1).map_err(|_| {
            CursorError::InvalidIdRange {
                min: min_id,
                max: max_id,
            }
        })?;
        Ok(Self {
            min_id,
            max_id,
            base: i64::from(min_id) - DESCRIPTOR_PADDING,
            slots: vec![NOOP; len],
        })
    }

    /// The declared id range.
    #[must_use]
    pub const fn declared_range(&self) -> (i32, i32) {
        (self.min_id, self.max_id)
    }

    /// Smallest and largest ids the table can hold, padding included.
    #[must_use]
    pub fn padded_range(&self) -> (i64, i64) {
        (self.base, self.base + self.slots.len() as i64 - 1)
    }

    fn index(&self, id: i64) -> Option<usize> {
        let index = usize::try_from(id.checked_sub(self.base)?).ok()?;
        (index < self.slots.len()).then_some(index)
    }

    /// Returns the descriptor for `id`; ids outside the table are no-ops.
    #[must_use]
    pub fn get(&self, id: i64) -> &PropertyDescriptor {
        self.index(id).map_or(&NOOP, |index| &self.slots[index])
    }

    /// Installs a descriptor.
    pub fn set(&mut self, id: i64, descriptor: PropertyDescriptor) -> CursorResult<()> {
        let (min, max) = self.padded_range();
        let index = self
            .index(id)
            .ok_or(CursorError::PropertyOutOfRange { id, min, max })?;
        self.slots[index] = descriptor;
        Ok(())
    }

    /// Iterates over declared descriptors with their ids.
    pub fn declared(&self) -> impl Iterator<Item = (i64, &PropertyDescriptor)> + '_ {
        let base = self.base;
        (base..)
            .zip(self.slots.iter())
            .filter(|(_, descriptor)| descriptor.declared)
    }
}
