//! Raw byte strings, arrays and maps.
//!
//! All three share the same three-tier header: a count embedded in the tag
//! byte, a 16-bit count, or a 32-bit count. Only the header is decoded here;
//! array and map members are left to the caller, and raw payloads are
//! returned as borrowed slices.

use crate::bytes;
use crate::error::{PackError, PackResult};
use crate::tag::{
    ElementKind, ARRAY16_TYPE, ARRAY32_TYPE, FIXARRAY_TYPE, FIXCONTAINER_MASK,
    FIXCONTAINER_VALUE_MASK, FIXMAP_TYPE, FIXRAW_MASK, FIXRAW_TYPE, FIXRAW_VALUE_MASK, MAP16_TYPE,
    MAP32_TYPE, RAW16_TYPE, RAW32_TYPE,
};

/// Header layout of one container family.
struct Family {
    kind: ElementKind,
    fix_type: u8,
    fix_mask: u8,
    fix_max: u8,
    type16: u8,
    type32: u8,
}

const RAW: Family = Family {
    kind: ElementKind::Raw,
    fix_type: FIXRAW_TYPE,
    fix_mask: FIXRAW_MASK,
    fix_max: FIXRAW_VALUE_MASK,
    type16: RAW16_TYPE,
    type32: RAW32_TYPE,
};

const ARRAY: Family = Family {
    kind: ElementKind::Array,
    fix_type: FIXARRAY_TYPE,
    fix_mask: FIXCONTAINER_MASK,
    fix_max: FIXCONTAINER_VALUE_MASK,
    type16: ARRAY16_TYPE,
    type32: ARRAY32_TYPE,
};

const MAP: Family = Family {
    kind: ElementKind::Map,
    fix_type: FIXMAP_TYPE,
    fix_mask: FIXCONTAINER_MASK,
    fix_max: FIXCONTAINER_VALUE_MASK,
    type16: MAP16_TYPE,
    type32: MAP32_TYPE,
};

impl Family {
    fn is(&self, buf: &[u8]) -> bool {
        buf.first().is_some_and(|&tag| {
            tag & self.fix_mask == self.fix_type || tag == self.type16 || tag == self.type32
        })
    }

    const fn sizeof(&self, count: u32) -> usize {
        if count <= self.fix_max as u32 {
            1
        } else if count <= u16::MAX as u32 {
            3
        } else {
            5
        }
    }

    fn sizeof_elem(&self, buf: &[u8]) -> PackResult<usize> {
        let tag = bytes::tag(buf)?;
        if tag & self.fix_mask == self.fix_type {
            Ok(1)
        } else if tag == self.type16 {
            Ok(3)
        } else if tag == self.type32 {
            Ok(5)
        } else {
            Err(bytes::mismatch(buf, self.kind))
        }
    }

    fn unpack(&self, buf: &[u8]) -> PackResult<(u32, usize)> {
        let tag = bytes::tag(buf)?;
        if tag & self.fix_mask == self.fix_type {
            Ok((u32::from(tag & self.fix_max), 1))
        } else if tag == self.type16 {
            let count = u16::from_be_bytes(bytes::payload::<2>(buf)?);
            Ok((u32::from(count), 3))
        } else if tag == self.type32 {
            let count = u32::from_be_bytes(bytes::payload::<4>(buf)?);
            Ok((count, 5))
        } else {
            Err(bytes::mismatch(buf, self.kind))
        }
    }

    fn pack(&self, out: &mut [u8], count: usize) -> PackResult<usize> {
        let count = u32::try_from(count).map_err(|_| PackError::LengthOverflow { length: count })?;
        match self.sizeof(count) {
            // fix_max fits the tag's value bits, so the cast is lossless.
            1 => bytes::write_tagged(out, self.fix_type | count as u8, &[]),
            3 => bytes::write_tagged(out, self.type16, &(count as u16).to_be_bytes()),
            _ => bytes::write_tagged(out, self.type32, &count.to_be_bytes()),
        }
    }
}

fn header_size(family: &Family, count: usize) -> PackResult<usize> {
    u32::try_from(count)
        .map(|count| family.sizeof(count))
        .map_err(|_| PackError::LengthOverflow { length: count })
}

//--------------------------------------
// Raw
//--------------------------------------

/// Returns `true` if the element is a raw byte string of any tier.
#[must_use]
pub fn is_raw(buf: &[u8]) -> bool {
    RAW.is(buf)
}

/// Returns the header size needed for a raw string of `length` bytes.
pub fn sizeof_raw(length: usize) -> PackResult<usize> {
    header_size(&RAW, length)
}

/// Returns the header size of the raw element at the start of `buf`.
pub fn sizeof_raw_elem(buf: &[u8]) -> PackResult<usize> {
    RAW.sizeof_elem(buf)
}

/// Reads a raw header, returning the payload length and the header size.
///
/// The payload starts immediately after the header and is not checked
/// against the buffer length; use [`unpack_raw_bytes`] for that.
pub fn unpack_raw(buf: &[u8]) -> PackResult<(u32, usize)> {
    RAW.unpack(buf)
}

/// Reads a raw element, returning the borrowed payload and the total size.
pub fn unpack_raw_bytes(buf: &[u8]) -> PackResult<(&[u8], usize)> {
    let (length, hdr) = RAW.unpack(buf)?;
    let total = hdr + length as usize;
    let payload = buf.get(hdr..total).ok_or(PackError::UnexpectedEof {
        requested: total,
        available: buf.len(),
    })?;
    Ok((payload, total))
}

/// Writes a raw header for a payload of `length` bytes.
pub fn pack_raw(out: &mut [u8], length: usize) -> PackResult<usize> {
    RAW.pack(out, length)
}

/// Writes a raw header followed by `payload`, returning the total size.
pub fn pack_raw_bytes(out: &mut [u8], payload: &[u8]) -> PackResult<usize> {
    let hdr = sizeof_raw(payload.len())?;
    let total = hdr + payload.len();
    if out.len() < total {
        return Err(PackError::BufferTooSmall {
            needed: total,
            available: out.len(),
        });
    }
    pack_raw(out, payload.len())?;
    out[hdr..total].copy_from_slice(payload);
    Ok(total)
}

//--------------------------------------
// Array
//--------------------------------------

/// Returns `true` if the element is an array header of any tier.
#[must_use]
pub fn is_array(buf: &[u8]) -> bool {
    ARRAY.is(buf)
}

/// Returns the header size needed for an array of `count` members.
pub fn sizeof_array(count: usize) -> PackResult<usize> {
    header_size(&ARRAY, count)
}

/// Returns the header size of the array element at the start of `buf`.
pub fn sizeof_array_elem(buf: &[u8]) -> PackResult<usize> {
    ARRAY.sizeof_elem(buf)
}

/// Reads an array header, returning the member count and the header size.
pub fn unpack_array(buf: &[u8]) -> PackResult<(u32, usize)> {
    ARRAY.unpack(buf)
}

/// Writes an array header for `count` members.
pub fn pack_array(out: &mut [u8], count: usize) -> PackResult<usize> {
    ARRAY.pack(out, count)
}

//--------------------------------------
// Map
//--------------------------------------

/// Returns `true` if the element is a map header of any tier.
#[must_use]
pub fn is_map(buf: &[u8]) -> bool {
    MAP.is(buf)
}

/// Returns the header size needed for a map of `count` entries.
pub fn sizeof_map(count: usize) -> PackResult<usize> {
    header_size(&MAP, count)
}

/// Returns the header size of the map element at the start of `buf`.
pub fn sizeof_map_elem(buf: &[u8]) -> PackResult<usize> {
    MAP.sizeof_elem(buf)
}

/// Reads a map header, returning the entry count and the header size.
pub fn unpack_map(buf: &[u8]) -> PackResult<(u32, usize)> {
    MAP.unpack(buf)
}

/// Writes a map header for `count` key/value entries.
pub fn pack_map(out: &mut [u8], count: usize) -> PackResult<usize> {
    MAP.pack(out, count)
}
