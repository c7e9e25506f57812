//! Generic element measurement.

use crate::bytes;
use crate::container;
use crate::error::{PackError, PackResult};
use crate::tag::{ElementKind, Format};

/// Returns the full size (header plus payload) of the scalar or raw element
/// at the start of `buf`.
///
/// Arrays and maps are not self-delimiting through this call: their total
/// size depends on their members, so they report a type mismatch. Reserved
/// tags do the same. An element whose bytes run past the end of `buf`
/// reports [`PackError::UnexpectedEof`].
pub fn sizeof_elem_and_data(buf: &[u8]) -> PackResult<usize> {
    let format = Format::peek(buf).ok_or_else(|| bytes::mismatch(buf, ElementKind::Raw))?;
    let size = match format.kind() {
        ElementKind::Array | ElementKind::Map => return Err(bytes::mismatch(buf, ElementKind::Raw)),
        ElementKind::Raw => {
            let (length, hdr) = container::unpack_raw(buf)?;
            hdr + length as usize
        }
        _ => format.header_size(),
    };
    if size > buf.len() {
        return Err(PackError::UnexpectedEof {
            requested: size,
            available: buf.len(),
        });
    }
    Ok(size)
}
