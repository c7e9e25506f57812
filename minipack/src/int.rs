//! Fixnums and the signed/unsigned integer families.
//!
//! Packing always selects the smallest size class that holds the value.
//! Generic decoding auto-detects the class present and widens to 64 bits.

use crate::bytes::{self, fixed_width};
use crate::error::PackResult;
use crate::tag::{
    neg_fixnum_value, ElementKind, Format, INT16_TYPE, INT32_TYPE, INT64_TYPE, INT8_TYPE,
    NEG_FIXNUM_MASK, NEG_FIXNUM_TYPE, POS_FIXNUM_MASK, POS_FIXNUM_MAX, UINT16_TYPE, UINT32_TYPE,
    UINT64_TYPE, UINT8_TYPE,
};

const NEG_FIXNUM_MIN: i64 = -32;

//--------------------------------------
// Fixnums
//--------------------------------------

/// Returns `true` if the element is a positive fixnum (0..=127).
#[must_use]
pub fn is_pos_fixnum(buf: &[u8]) -> bool {
    buf.first().is_some_and(|tag| tag & POS_FIXNUM_MASK == 0)
}

/// Reads a positive fixnum.
pub fn unpack_pos_fixnum(buf: &[u8]) -> PackResult<(u8, usize)> {
    let tag = bytes::tag(buf)?;
    if tag & POS_FIXNUM_MASK != 0 {
        return Err(bytes::mismatch(buf, ElementKind::UInt));
    }
    Ok((tag, 1))
}

/// Writes a positive fixnum. Only the low 7 bits of `value` are stored.
pub fn pack_pos_fixnum(out: &mut [u8], value: u8) -> PackResult<usize> {
    bytes::write_tagged(out, value & POS_FIXNUM_MAX, &[])
}

/// Returns `true` if the element is a negative fixnum (-32..=-1).
#[must_use]
pub fn is_neg_fixnum(buf: &[u8]) -> bool {
    buf.first()
        .is_some_and(|tag| tag & NEG_FIXNUM_MASK == NEG_FIXNUM_TYPE)
}

/// Reads a negative fixnum.
pub fn unpack_neg_fixnum(buf: &[u8]) -> PackResult<(i8, usize)> {
    let tag = bytes::tag(buf)?;
    if tag & NEG_FIXNUM_MASK != NEG_FIXNUM_TYPE {
        return Err(bytes::mismatch(buf, ElementKind::Int));
    }
    Ok((neg_fixnum_value(tag), 1))
}

/// Writes a negative fixnum. `value` must lie in -32..=-1.
pub fn pack_neg_fixnum(out: &mut [u8], value: i8) -> PackResult<usize> {
    let tag = (value.wrapping_add(32) as u8) | NEG_FIXNUM_TYPE;
    bytes::write_tagged(out, tag, &[])
}

//--------------------------------------
// Unsigned integers
//--------------------------------------

fixed_width!("uint8", u8, 1, UINT8_TYPE, ElementKind::UInt, is_uint8, unpack_uint8, pack_uint8);
fixed_width!("uint16", u16, 2, UINT16_TYPE, ElementKind::UInt, is_uint16, unpack_uint16, pack_uint16);
fixed_width!("uint32", u32, 4, UINT32_TYPE, ElementKind::UInt, is_uint32, unpack_uint32, pack_uint32);
fixed_width!("uint64", u64, 8, UINT64_TYPE, ElementKind::UInt, is_uint64, unpack_uint64, pack_uint64);

/// Returns the packed size of `value` as an unsigned integer.
#[must_use]
pub const fn sizeof_uint(value: u64) -> usize {
    if value <= POS_FIXNUM_MAX as u64 {
        1
    } else if value <= u8::MAX as u64 {
        2
    } else if value <= u16::MAX as u64 {
        3
    } else if value <= u32::MAX as u64 {
        5
    } else {
        9
    }
}

/// Returns the size of the unsigned integer element at the start of `buf`.
pub fn sizeof_uint_elem(buf: &[u8]) -> PackResult<usize> {
    match Format::peek(buf) {
        Some(
            format @ (Format::PositiveFixnum(_)
            | Format::UInt8
            | Format::UInt16
            | Format::UInt32
            | Format::UInt64),
        ) => Ok(format.header_size()),
        _ => Err(bytes::mismatch(buf, ElementKind::UInt)),
    }
}

/// Returns `true` if the element is any unsigned integer class.
#[must_use]
pub fn is_uint(buf: &[u8]) -> bool {
    sizeof_uint_elem(buf).is_ok()
}

/// Reads an unsigned integer of any size class, widened to 64 bits.
pub fn unpack_uint(buf: &[u8]) -> PackResult<(u64, usize)> {
    match Format::peek(buf) {
        Some(Format::PositiveFixnum(value)) => Ok((u64::from(value), 1)),
        Some(Format::UInt8) => unpack_uint8(buf).map(|(v, sz)| (u64::from(v), sz)),
        Some(Format::UInt16) => unpack_uint16(buf).map(|(v, sz)| (u64::from(v), sz)),
        Some(Format::UInt32) => unpack_uint32(buf).map(|(v, sz)| (u64::from(v), sz)),
        Some(Format::UInt64) => unpack_uint64(buf),
        _ => Err(bytes::mismatch(buf, ElementKind::UInt)),
    }
}

/// Writes an unsigned integer using the smallest size class.
pub fn pack_uint(out: &mut [u8], value: u64) -> PackResult<usize> {
    match sizeof_uint(value) {
        1 => pack_pos_fixnum(out, value as u8),
        2 => pack_uint8(out, value as u8),
        3 => pack_uint16(out, value as u16),
        5 => pack_uint32(out, value as u32),
        _ => pack_uint64(out, value),
    }
}

//--------------------------------------
// Signed integers
//--------------------------------------

fixed_width!("int8", i8, 1, INT8_TYPE, ElementKind::Int, is_int8, unpack_int8, pack_int8);
fixed_width!("int16", i16, 2, INT16_TYPE, ElementKind::Int, is_int16, unpack_int16, pack_int16);
fixed_width!("int32", i32, 4, INT32_TYPE, ElementKind::Int, is_int32, unpack_int32, pack_int32);
fixed_width!("int64", i64, 8, INT64_TYPE, ElementKind::Int, is_int64, unpack_int64, pack_int64);

/// Returns the packed size of `value` as a signed integer.
#[must_use]
pub const fn sizeof_int(value: i64) -> usize {
    if value >= NEG_FIXNUM_MIN && value <= POS_FIXNUM_MAX as i64 {
        1
    } else if value >= i8::MIN as i64 && value <= i8::MAX as i64 {
        2
    } else if value >= i16::MIN as i64 && value <= i16::MAX as i64 {
        3
    } else if value >= i32::MIN as i64 && value <= i32::MAX as i64 {
        5
    } else {
        9
    }
}

/// Returns the size of the integer element at the start of `buf`.
///
/// Unsigned encodings are accepted, matching [`unpack_int`].
pub fn sizeof_int_elem(buf: &[u8]) -> PackResult<usize> {
    match Format::peek(buf) {
        Some(format) if matches!(format.kind(), ElementKind::Int | ElementKind::UInt) => {
            Ok(format.header_size())
        }
        _ => Err(bytes::mismatch(buf, ElementKind::Int)),
    }
}

/// Returns `true` if the element decodes as a signed integer.
#[must_use]
pub fn is_int(buf: &[u8]) -> bool {
    sizeof_int_elem(buf).is_ok()
}

/// Reads a signed integer of any size class, widened to 64 bits.
///
/// When no signed tag matches, unsigned encodings are accepted as well; a
/// `uint64` above `i64::MAX` wraps.
pub fn unpack_int(buf: &[u8]) -> PackResult<(i64, usize)> {
    match Format::peek(buf) {
        Some(Format::PositiveFixnum(value)) => Ok((i64::from(value), 1)),
        Some(Format::NegativeFixnum(value)) => Ok((i64::from(value), 1)),
        Some(Format::Int8) => unpack_int8(buf).map(|(v, sz)| (i64::from(v), sz)),
        Some(Format::Int16) => unpack_int16(buf).map(|(v, sz)| (i64::from(v), sz)),
        Some(Format::Int32) => unpack_int32(buf).map(|(v, sz)| (i64::from(v), sz)),
        Some(Format::Int64) => unpack_int64(buf),
        Some(Format::UInt8 | Format::UInt16 | Format::UInt32 | Format::UInt64) => {
            unpack_uint(buf).map(|(v, sz)| (v as i64, sz))
        }
        _ => Err(bytes::mismatch(buf, ElementKind::Int)),
    }
}

/// Writes a signed integer using the smallest size class.
pub fn pack_int(out: &mut [u8], value: i64) -> PackResult<usize> {
    if (0..=i64::from(POS_FIXNUM_MAX)).contains(&value) {
        pack_pos_fixnum(out, value as u8)
    } else if (NEG_FIXNUM_MIN..0).contains(&value) {
        pack_neg_fixnum(out, value as i8)
    } else if let Ok(v) = i8::try_from(value) {
        pack_int8(out, v)
    } else if let Ok(v) = i16::try_from(value) {
        pack_int16(out, v)
    } else if let Ok(v) = i32::try_from(value) {
        pack_int32(out, v)
    } else {
        pack_int64(out, value)
    }
}
