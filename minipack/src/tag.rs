//! Tag byte constants and element classification.

use std::fmt;

/// Largest header of any scalar element (tag + 8 payload bytes).
pub const MAX_SCALAR_SIZE: usize = 9;

pub(crate) const POS_FIXNUM_MAX: u8 = 0x7F;
pub(crate) const POS_FIXNUM_MASK: u8 = 0x80;

pub(crate) const NEG_FIXNUM_TYPE: u8 = 0xE0;
pub(crate) const NEG_FIXNUM_MASK: u8 = 0xE0;
pub(crate) const NEG_FIXNUM_VALUE_MASK: u8 = 0x1F;

pub(crate) const NIL_TYPE: u8 = 0xC0;
pub(crate) const FALSE_TYPE: u8 = 0xC2;
pub(crate) const TRUE_TYPE: u8 = 0xC3;

pub(crate) const FLOAT_TYPE: u8 = 0xCA;
pub(crate) const DOUBLE_TYPE: u8 = 0xCB;

pub(crate) const UINT8_TYPE: u8 = 0xCC;
pub(crate) const UINT16_TYPE: u8 = 0xCD;
pub(crate) const UINT32_TYPE: u8 = 0xCE;
pub(crate) const UINT64_TYPE: u8 = 0xCF;

pub(crate) const INT8_TYPE: u8 = 0xD0;
pub(crate) const INT16_TYPE: u8 = 0xD1;
pub(crate) const INT32_TYPE: u8 = 0xD2;
pub(crate) const INT64_TYPE: u8 = 0xD3;

pub(crate) const FIXRAW_TYPE: u8 = 0xA0;
pub(crate) const FIXRAW_MASK: u8 = 0xE0;
pub(crate) const FIXRAW_VALUE_MASK: u8 = 0x1F;
pub(crate) const RAW16_TYPE: u8 = 0xDA;
pub(crate) const RAW32_TYPE: u8 = 0xDB;

pub(crate) const FIXARRAY_TYPE: u8 = 0x90;
pub(crate) const ARRAY16_TYPE: u8 = 0xDC;
pub(crate) const ARRAY32_TYPE: u8 = 0xDD;

pub(crate) const FIXMAP_TYPE: u8 = 0x80;
pub(crate) const MAP16_TYPE: u8 = 0xDE;
pub(crate) const MAP32_TYPE: u8 = 0xDF;

/// Shared mask/value mask for fixarray and fixmap tags.
pub(crate) const FIXCONTAINER_MASK: u8 = 0xF0;
pub(crate) const FIXCONTAINER_VALUE_MASK: u8 = 0x0F;

/// Logical element kinds, as requested by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Nil,
    Bool,
    UInt,
    Int,
    Float,
    Double,
    Raw,
    Array,
    Map,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Nil => "nil",
            Self::Bool => "bool",
            Self::UInt => "uint",
            Self::Int => "int",
            Self::Float => "float",
            Self::Double => "double",
            Self::Raw => "raw",
            Self::Array => "array",
            Self::Map => "map",
        };
        write!(f, "{name}")
    }
}

/// The concrete encoding selected by a tag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    PositiveFixnum(u8),
    NegativeFixnum(i8),
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Int8,
    Int16,
    Int32,
    Int64,
    Nil,
    False,
    True,
    Float32,
    Float64,
    FixRaw(u8),
    Raw16,
    Raw32,
    FixArray(u8),
    Array16,
    Array32,
    FixMap(u8),
    Map16,
    Map32,
}

impl Format {
    /// Classifies a tag byte. Returns `None` for reserved tags.
    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        if tag & POS_FIXNUM_MASK == 0 {
            return Some(Self::PositiveFixnum(tag));
        }
        if tag & NEG_FIXNUM_MASK == NEG_FIXNUM_TYPE {
            return Some(Self::NegativeFixnum(neg_fixnum_value(tag)));
        }
        if tag & FIXRAW_MASK == FIXRAW_TYPE {
            return Some(Self::FixRaw(tag & FIXRAW_VALUE_MASK));
        }
        if tag & FIXCONTAINER_MASK == FIXARRAY_TYPE {
            return Some(Self::FixArray(tag & FIXCONTAINER_VALUE_MASK));
        }
        if tag & FIXCONTAINER_MASK == FIXMAP_TYPE {
            return Some(Self::FixMap(tag & FIXCONTAINER_VALUE_MASK));
        }
        let format = match tag {
            NIL_TYPE => Self::Nil,
            FALSE_TYPE => Self::False,
            TRUE_TYPE => Self::True,
            FLOAT_TYPE => Self::Float32,
            DOUBLE_TYPE => Self::Float64,
            UINT8_TYPE => Self::UInt8,
            UINT16_TYPE => Self::UInt16,
            UINT32_TYPE => Self::UInt32,
            UINT64_TYPE => Self::UInt64,
            INT8_TYPE => Self::Int8,
            INT16_TYPE => Self::Int16,
            INT32_TYPE => Self::Int32,
            INT64_TYPE => Self::Int64,
            RAW16_TYPE => Self::Raw16,
            RAW32_TYPE => Self::Raw32,
            ARRAY16_TYPE => Self::Array16,
            ARRAY32_TYPE => Self::Array32,
            MAP16_TYPE => Self::Map16,
            MAP32_TYPE => Self::Map32,
            _ => return None,
        };
        Some(format)
    }

    /// Classifies the element at the start of `buf`.
    #[must_use]
    pub fn peek(buf: &[u8]) -> Option<Self> {
        buf.first().copied().and_then(Self::from_tag)
    }

    /// Size of the element header in bytes, including the tag.
    ///
    /// For scalars this is the whole element.
    #[must_use]
    pub const fn header_size(self) -> usize {
        match self {
            Self::PositiveFixnum(_)
            | Self::NegativeFixnum(_)
            | Self::Nil
            | Self::False
            | Self::True
            | Self::FixRaw(_)
            | Self::FixArray(_)
            | Self::FixMap(_) => 1,
            Self::UInt8 | Self::Int8 => 2,
            Self::UInt16 | Self::Int16 | Self::Raw16 | Self::Array16 | Self::Map16 => 3,
            Self::UInt32
            | Self::Int32
            | Self::Float32
            | Self::Raw32
            | Self::Array32
            | Self::Map32 => 5,
            Self::UInt64 | Self::Int64 | Self::Float64 => 9,
        }
    }

    /// The logical kind this format belongs to.
    ///
    /// Positive fixnums report [`ElementKind::UInt`]; they also decode as
    /// signed integers.
    #[must_use]
    pub const fn kind(self) -> ElementKind {
        match self {
            Self::PositiveFixnum(_) | Self::UInt8 | Self::UInt16 | Self::UInt32 | Self::UInt64 => {
                ElementKind::UInt
            }
            Self::NegativeFixnum(_) | Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64 => {
                ElementKind::Int
            }
            Self::Nil => ElementKind::Nil,
            Self::False | Self::True => ElementKind::Bool,
            Self::Float32 => ElementKind::Float,
            Self::Float64 => ElementKind::Double,
            Self::FixRaw(_) | Self::Raw16 | Self::Raw32 => ElementKind::Raw,
            Self::FixArray(_) | Self::Array16 | Self::Array32 => ElementKind::Array,
            Self::FixMap(_) | Self::Map16 | Self::Map32 => ElementKind::Map,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PositiveFixnum(v) => write!(f, "positive fixnum {v}"),
            Self::NegativeFixnum(v) => write!(f, "negative fixnum {v}"),
            Self::FixRaw(len) => write!(f, "fixraw[{len}]"),
            Self::FixArray(count) => write!(f, "fixarray[{count}]"),
            Self::FixMap(count) => write!(f, "fixmap[{count}]"),
            other => {
                let name = match other {
                    Self::UInt8 => "uint8",
                    Self::UInt16 => "uint16",
                    Self::UInt32 => "uint32",
                    Self::UInt64 => "uint64",
                    Self::Int8 => "int8",
                    Self::Int16 => "int16",
                    Self::Int32 => "int32",
                    Self::Int64 => "int64",
                    Self::Nil => "nil",
                    Self::False => "false",
                    Self::True => "true",
                    Self::Float32 => "float32",
                    Self::Float64 => "float64",
                    Self::Raw16 => "raw16",
                    Self::Raw32 => "raw32",
                    Self::Array16 => "array16",
                    Self::Array32 => "array32",
                    Self::Map16 => "map16",
                    _ => "map32",
                };
                write!(f, "{name}")
            }
        }
    }
}

/// Decodes the value of a negative fixnum tag: `-(32 - low 5 bits)`.
pub(crate) const fn neg_fixnum_value(tag: u8) -> i8 {
    (tag & NEG_FIXNUM_VALUE_MASK) as i8 - 32
}
