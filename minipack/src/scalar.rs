//! Nil, booleans and IEEE754 floats.

use crate::bytes::{self, fixed_width};
use crate::error::PackResult;
use crate::tag::{ElementKind, DOUBLE_TYPE, FALSE_TYPE, FLOAT_TYPE, NIL_TYPE, TRUE_TYPE};

//--------------------------------------
// Nil
//--------------------------------------

/// Packed size of nil.
pub const NIL_SIZE: usize = 1;

/// Returns `true` if the element is nil.
#[must_use]
pub fn is_nil(buf: &[u8]) -> bool {
    buf.first() == Some(&NIL_TYPE)
}

/// Reads a nil element, returning its size.
pub fn unpack_nil(buf: &[u8]) -> PackResult<usize> {
    bytes::expect_tag(buf, NIL_TYPE, ElementKind::Nil)?;
    Ok(NIL_SIZE)
}

/// Writes a nil element.
pub fn pack_nil(out: &mut [u8]) -> PackResult<usize> {
    bytes::write_tagged(out, NIL_TYPE, &[])
}

//--------------------------------------
// Boolean
//--------------------------------------

/// Packed size of a boolean.
pub const BOOL_SIZE: usize = 1;

/// Returns `true` if the element is a boolean of either value.
#[must_use]
pub fn is_bool(buf: &[u8]) -> bool {
    is_true(buf) || is_false(buf)
}

/// Returns `true` if the element is the boolean `true`.
#[must_use]
pub fn is_true(buf: &[u8]) -> bool {
    buf.first() == Some(&TRUE_TYPE)
}

/// Returns `true` if the element is the boolean `false`.
#[must_use]
pub fn is_false(buf: &[u8]) -> bool {
    buf.first() == Some(&FALSE_TYPE)
}

/// Reads a boolean.
pub fn unpack_bool(buf: &[u8]) -> PackResult<(bool, usize)> {
    match bytes::tag(buf)? {
        TRUE_TYPE => Ok((true, BOOL_SIZE)),
        FALSE_TYPE => Ok((false, BOOL_SIZE)),
        _ => Err(bytes::mismatch(buf, ElementKind::Bool)),
    }
}

/// Writes a boolean.
pub fn pack_bool(out: &mut [u8], value: bool) -> PackResult<usize> {
    let tag = if value { TRUE_TYPE } else { FALSE_TYPE };
    bytes::write_tagged(out, tag, &[])
}

//--------------------------------------
// Floating point
//--------------------------------------

/// Packed size of a float32.
pub const FLOAT_SIZE: usize = 5;

/// Packed size of a float64.
pub const DOUBLE_SIZE: usize = 9;

fixed_width!("float32", f32, 4, FLOAT_TYPE, ElementKind::Float, is_float, unpack_float, pack_float);
fixed_width!("float64", f64, 8, DOUBLE_TYPE, ElementKind::Double, is_double, unpack_double, pack_double);
