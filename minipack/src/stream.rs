//! Element I/O over `std::io` readers and writers.
//!
//! Readers peek the tag byte through [`BufRead::fill_buf`] and only consume
//! input once the tag matches the requested kind. A mismatch is reported as
//! [`io::ErrorKind::InvalidData`] wrapping the [`PackError`].

use std::io::{self, BufRead, Read, Write};

use crate::container;
use crate::error::PackError;
use crate::int;
use crate::scalar;
use crate::tag::{ElementKind, Format, MAX_SCALAR_SIZE};

fn invalid_data(err: PackError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err)
}

fn peek_tag<R: BufRead>(reader: &mut R) -> io::Result<u8> {
    reader
        .fill_buf()?
        .first()
        .copied()
        .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))
}

/// Reads the header of the next element if `accepts` its format, then
/// decodes it from the collected bytes.
fn read_header<R, T>(
    reader: &mut R,
    kind: ElementKind,
    accepts: impl Fn(Format) -> bool,
    decode: impl FnOnce(&[u8]) -> Result<(T, usize), PackError>,
) -> io::Result<(T, usize)>
where
    R: BufRead,
{
    let tag = peek_tag(reader)?;
    let format = Format::from_tag(tag)
        .filter(|format| accepts(*format))
        .ok_or_else(|| invalid_data(PackError::TypeMismatch { expected: kind, found: tag }))?;
    let hdr = format.header_size();
    let mut buf = [0u8; MAX_SCALAR_SIZE];
    buf[0] = tag;
    reader.consume(1);
    reader.read_exact(&mut buf[1..hdr])?;
    decode(&buf[..hdr]).map_err(invalid_data)
}

fn write_scalar<W: Write>(
    writer: &mut W,
    pack: impl FnOnce(&mut [u8]) -> Result<usize, PackError>,
) -> io::Result<usize> {
    let mut buf = [0u8; MAX_SCALAR_SIZE];
    let size = pack(&mut buf).map_err(invalid_data)?;
    writer.write_all(&buf[..size])?;
    Ok(size)
}

/// Reads an unsigned integer of any class.
pub fn read_uint<R: BufRead>(reader: &mut R) -> io::Result<(u64, usize)> {
    read_header(
        reader,
        ElementKind::UInt,
        |f| f.kind() == ElementKind::UInt,
        int::unpack_uint,
    )
}

/// Reads a signed integer of any class (unsigned encodings accepted).
pub fn read_int<R: BufRead>(reader: &mut R) -> io::Result<(i64, usize)> {
    read_header(
        reader,
        ElementKind::Int,
        |f| matches!(f.kind(), ElementKind::Int | ElementKind::UInt),
        int::unpack_int,
    )
}

/// Reads nil.
pub fn read_nil<R: BufRead>(reader: &mut R) -> io::Result<((), usize)> {
    read_header(
        reader,
        ElementKind::Nil,
        |f| f == Format::Nil,
        |buf| scalar::unpack_nil(buf).map(|size| ((), size)),
    )
}

/// Reads a boolean.
pub fn read_bool<R: BufRead>(reader: &mut R) -> io::Result<(bool, usize)> {
    read_header(
        reader,
        ElementKind::Bool,
        |f| f.kind() == ElementKind::Bool,
        scalar::unpack_bool,
    )
}

/// Reads a float32.
pub fn read_float<R: BufRead>(reader: &mut R) -> io::Result<(f32, usize)> {
    read_header(
        reader,
        ElementKind::Float,
        |f| f == Format::Float32,
        scalar::unpack_float,
    )
}

/// Reads a float64.
pub fn read_double<R: BufRead>(reader: &mut R) -> io::Result<(f64, usize)> {
    read_header(
        reader,
        ElementKind::Double,
        |f| f == Format::Float64,
        scalar::unpack_double,
    )
}

/// Reads a raw element, returning an owned copy of its payload.
pub fn read_raw<R: BufRead>(reader: &mut R) -> io::Result<(Vec<u8>, usize)> {
    let (length, hdr) = read_header(
        reader,
        ElementKind::Raw,
        |f| f.kind() == ElementKind::Raw,
        container::unpack_raw,
    )?;
    // The length is untrusted: grow with the input rather than up front.
    let mut payload = Vec::new();
    let read = reader
        .by_ref()
        .take(u64::from(length))
        .read_to_end(&mut payload)?;
    if read as u64 != u64::from(length) {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            PackError::UnexpectedEof {
                requested: hdr.saturating_add(length as usize),
                available: hdr + read,
            },
        ));
    }
    Ok((payload, hdr + read))
}

/// Reads an array header, returning the member count.
pub fn read_array<R: BufRead>(reader: &mut R) -> io::Result<(u32, usize)> {
    read_header(
        reader,
        ElementKind::Array,
        |f| f.kind() == ElementKind::Array,
        container::unpack_array,
    )
}

/// Reads a map header, returning the entry count.
pub fn read_map<R: BufRead>(reader: &mut R) -> io::Result<(u32, usize)> {
    read_header(
        reader,
        ElementKind::Map,
        |f| f.kind() == ElementKind::Map,
        container::unpack_map,
    )
}

/// Writes an unsigned integer in its smallest class.
pub fn write_uint<W: Write>(writer: &mut W, value: u64) -> io::Result<usize> {
    write_scalar(writer, |buf| int::pack_uint(buf, value))
}

/// Writes a signed integer in its smallest class.
pub fn write_int<W: Write>(writer: &mut W, value: i64) -> io::Result<usize> {
    write_scalar(writer, |buf| int::pack_int(buf, value))
}

/// Writes nil.
pub fn write_nil<W: Write>(writer: &mut W) -> io::Result<usize> {
    write_scalar(writer, scalar::pack_nil)
}

/// Writes a boolean.
pub fn write_bool<W: Write>(writer: &mut W, value: bool) -> io::Result<usize> {
    write_scalar(writer, |buf| scalar::pack_bool(buf, value))
}

/// Writes a float32.
pub fn write_float<W: Write>(writer: &mut W, value: f32) -> io::Result<usize> {
    write_scalar(writer, |buf| scalar::pack_float(buf, value))
}

/// Writes a float64.
pub fn write_double<W: Write>(writer: &mut W, value: f64) -> io::Result<usize> {
    write_scalar(writer, |buf| scalar::pack_double(buf, value))
}

/// Writes a raw header followed by `payload`.
pub fn write_raw<W: Write>(writer: &mut W, payload: &[u8]) -> io::Result<usize> {
    let hdr = write_scalar(writer, |buf| container::pack_raw(buf, payload.len()))?;
    writer.write_all(payload)?;
    Ok(hdr + payload.len())
}

/// Writes an array header.
pub fn write_array<W: Write>(writer: &mut W, count: usize) -> io::Result<usize> {
    write_scalar(writer, |buf| container::pack_array(buf, count))
}

/// Writes a map header.
pub fn write_map<W: Write>(writer: &mut W, count: usize) -> io::Result<usize> {
    write_scalar(writer, |buf| container::pack_map(buf, count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn stream_roundtrip() {
        let mut out = Vec::new();
        write_map(&mut out, 1).unwrap();
        write_int(&mut out, -3).unwrap();
        write_raw(&mut out, b"super").unwrap();
        write_double(&mut out, 100.2).unwrap();
        write_bool(&mut out, true).unwrap();
        write_nil(&mut out).unwrap();
        write_uint(&mut out, 70_000).unwrap();

        let mut input = Cursor::new(out);
        assert_eq!(read_map(&mut input).unwrap(), (1, 1));
        assert_eq!(read_int(&mut input).unwrap(), (-3, 1));
        assert_eq!(read_raw(&mut input).unwrap(), (b"super".to_vec(), 6));
        assert_eq!(read_double(&mut input).unwrap(), (100.2, 9));
        assert_eq!(read_bool(&mut input).unwrap(), (true, 1));
        assert_eq!(read_nil(&mut input).unwrap(), ((), 1));
        assert_eq!(read_uint(&mut input).unwrap(), (70_000, 5));
    }

    #[test]
    fn mismatch_does_not_consume() {
        let mut input = Cursor::new(vec![0xC3]);
        let err = read_int(&mut input).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert_eq!(input.position(), 0);
        assert_eq!(read_bool(&mut input).unwrap(), (true, 1));
    }

    #[test]
    fn truncated_payload_is_eof() {
        let mut input = Cursor::new(vec![0xCD, 0x01]);
        let err = read_uint(&mut input).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);

        let mut input = Cursor::new(Vec::new());
        assert_eq!(
            read_nil(&mut input).unwrap_err().kind(),
            io::ErrorKind::UnexpectedEof
        );
    }

    #[test]
    fn truncated_raw32_is_eof() {
        let mut input = Cursor::new(vec![0xDB, 0xFF, 0xFF, 0xFF, 0xFF, b'a']);
        let err = read_raw(&mut input).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);

        let mut input = Cursor::new(vec![0xA3, b'a', b'b']);
        assert_eq!(
            read_raw(&mut input).unwrap_err().kind(),
            io::ErrorKind::UnexpectedEof
        );
    }

    #[test]
    fn float_and_array() {
        let mut out = Vec::new();
        write_array(&mut out, 20).unwrap();
        write_float(&mut out, 2.0).unwrap();
        let mut input = Cursor::new(out);
        assert_eq!(read_array(&mut input).unwrap(), (20, 3));
        assert_eq!(read_float(&mut input).unwrap(), (2.0, 5));
    }
}
