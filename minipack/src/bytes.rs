//! Bounds-checked byte helpers shared by the element families.

use crate::error::{PackError, PackResult};
use crate::tag::ElementKind;

/// Returns the tag byte, or an EOF error for an empty buffer.
pub(crate) fn tag(buf: &[u8]) -> PackResult<u8> {
    buf.first().copied().ok_or(PackError::UnexpectedEof {
        requested: 1,
        available: 0,
    })
}

/// Builds the error reported when `buf` does not hold a `kind` element.
pub(crate) fn mismatch(buf: &[u8], kind: ElementKind) -> PackError {
    match buf.first() {
        Some(&found) => PackError::TypeMismatch {
            expected: kind,
            found,
        },
        None => PackError::UnexpectedEof {
            requested: 1,
            available: 0,
        },
    }
}

/// Checks that `buf` starts with exactly `expected`.
pub(crate) fn expect_tag(buf: &[u8], expected: u8, kind: ElementKind) -> PackResult<()> {
    if tag(buf)? == expected {
        Ok(())
    } else {
        Err(mismatch(buf, kind))
    }
}

/// Reads the `N` payload bytes that follow the tag.
pub(crate) fn payload<const N: usize>(buf: &[u8]) -> PackResult<[u8; N]> {
    let end = 1 + N;
    let bytes = buf.get(1..end).ok_or(PackError::UnexpectedEof {
        requested: end,
        available: buf.len(),
    })?;
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    Ok(out)
}

/// Writes a tag followed by `payload`, returning the element size.
pub(crate) fn write_tagged(out: &mut [u8], tag: u8, payload: &[u8]) -> PackResult<usize> {
    let needed = 1 + payload.len();
    if out.len() < needed {
        return Err(PackError::BufferTooSmall {
            needed,
            available: out.len(),
        });
    }
    out[0] = tag;
    out[1..needed].copy_from_slice(payload);
    Ok(needed)
}

/// Generates `is_*`, `unpack_*` and `pack_*` for a tag followed by a
/// big-endian fixed-width payload.
macro_rules! fixed_width {
    ($name:literal, $ty:ty, $size:literal, $tag:expr, $kind:expr, $is:ident, $unpack:ident, $pack:ident) => {
        #[doc = concat!("Returns `true` if the element is a ", $name, ".")]
        #[must_use]
        pub fn $is(buf: &[u8]) -> bool {
            buf.first() == Some(&$tag)
        }

        #[doc = concat!("Reads a ", $name, ", returning the value and the element size.")]
        pub fn $unpack(buf: &[u8]) -> $crate::error::PackResult<($ty, usize)> {
            $crate::bytes::expect_tag(buf, $tag, $kind)?;
            let bytes = $crate::bytes::payload::<$size>(buf)?;
            Ok((<$ty>::from_be_bytes(bytes), 1 + $size))
        }

        #[doc = concat!("Writes a ", $name, ", returning the element size.")]
        pub fn $pack(out: &mut [u8], value: $ty) -> $crate::error::PackResult<usize> {
            $crate::bytes::write_tagged(out, $tag, &value.to_be_bytes())
        }
    };
}

pub(crate) use fixed_width;
