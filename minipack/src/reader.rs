//! Positioned element reader over a borrowed buffer.

use crate::container;
use crate::elem;
use crate::error::{PackError, PackResult};
use crate::int;
use crate::scalar;
use crate::tag::{ElementKind, Format};

/// Sequential reader that decodes one element at a time.
///
/// Every read is bounds-checked. A failed read leaves the position where it
/// was, so callers can retry the same bytes as a different kind.
#[derive(Debug, Clone)]
pub struct ElementReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ElementReader<'a> {
    /// Creates a reader positioned at the start of `data`.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the current byte offset.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of unread bytes.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Returns `true` once every byte has been consumed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the unread tail of the buffer.
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        self.data.get(self.pos..).unwrap_or_default()
    }

    /// Classifies the next element without consuming it.
    #[must_use]
    pub fn peek_format(&self) -> Option<Format> {
        Format::peek(self.rest())
    }

    fn step<T>(&mut self, result: PackResult<(T, usize)>) -> PackResult<T> {
        let (value, size) = result?;
        self.pos += size;
        Ok(value)
    }

    /// Reads a signed integer of any class (unsigned encodings accepted).
    pub fn read_int(&mut self) -> PackResult<i64> {
        let result = int::unpack_int(self.rest());
        self.step(result)
    }

    /// Reads an unsigned integer of any class.
    pub fn read_uint(&mut self) -> PackResult<u64> {
        let result = int::unpack_uint(self.rest());
        self.step(result)
    }

    /// Reads a nil element.
    pub fn read_nil(&mut self) -> PackResult<()> {
        let result = scalar::unpack_nil(self.rest()).map(|size| ((), size));
        self.step(result)
    }

    /// Reads a boolean.
    pub fn read_bool(&mut self) -> PackResult<bool> {
        let result = scalar::unpack_bool(self.rest());
        self.step(result)
    }

    /// Reads a float32.
    pub fn read_float(&mut self) -> PackResult<f32> {
        let result = scalar::unpack_float(self.rest());
        self.step(result)
    }

    /// Reads a float64.
    pub fn read_double(&mut self) -> PackResult<f64> {
        let result = scalar::unpack_double(self.rest());
        self.step(result)
    }

    /// Reads a raw element and returns its payload as a sub-slice.
    pub fn read_raw(&mut self) -> PackResult<&'a [u8]> {
        let result = container::unpack_raw_bytes(self.rest());
        self.step(result)
    }

    /// Reads an array header and returns the member count.
    pub fn read_array(&mut self) -> PackResult<u32> {
        let result = container::unpack_array(self.rest());
        self.step(result)
    }

    /// Reads a map header and returns the entry count.
    pub fn read_map(&mut self) -> PackResult<u32> {
        let result = container::unpack_map(self.rest());
        self.step(result)
    }

    /// Skips one complete element, including all members of containers.
    ///
    /// Nested containers are walked iteratively. On error the position is
    /// restored to where the skip started.
    pub fn skip_elem(&mut self) -> PackResult<usize> {
        let start = self.pos;
        let result = self.skip_inner();
        if result.is_err() {
            self.pos = start;
        }
        result.map(|()| self.pos - start)
    }

    fn skip_inner(&mut self) -> PackResult<()> {
        let mut pending: u64 = 1;
        while pending > 0 {
            pending -= 1;
            let rest = self.rest();
            match Format::peek(rest).map(Format::kind) {
                Some(ElementKind::Array) => {
                    pending += u64::from(self.read_array()?);
                }
                Some(ElementKind::Map) => {
                    pending += 2 * u64::from(self.read_map()?);
                }
                _ => {
                    self.pos += elem::sizeof_elem_and_data(rest)?;
                }
            }
            if pending > self.remaining() as u64 {
                // Every member takes at least one byte.
                return Err(PackError::UnexpectedEof {
                    requested: self.pos + usize::try_from(pending).unwrap_or(usize::MAX),
                    available: self.data.len(),
                });
            }
        }
        Ok(())
    }
}
