//! Growable element writer.

use crate::container;
use crate::error::PackResult;
use crate::int;
use crate::scalar;
use crate::tag::MAX_SCALAR_SIZE;

/// Appends packed elements to an owned byte vector.
///
/// Scalars are always packed in their smallest size class. Call
/// [`finish`](Self::finish) to take the bytes.
#[derive(Debug, Default, Clone)]
pub struct ElementWriter {
    bytes: Vec<u8>,
}

impl ElementWriter {
    /// Creates an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a writer with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
        }
    }

    /// Returns the number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the bytes written so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Finishes writing and returns the byte buffer.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }

    fn append(&mut self, pack: impl FnOnce(&mut [u8]) -> PackResult<usize>) -> PackResult<usize> {
        let mut scratch = [0u8; MAX_SCALAR_SIZE];
        let size = pack(&mut scratch)?;
        self.bytes.extend_from_slice(&scratch[..size]);
        Ok(size)
    }

    /// Writes a signed integer.
    pub fn write_int(&mut self, value: i64) -> usize {
        // Scratch always fits the largest scalar.
        self.append(|out| int::pack_int(out, value)).unwrap_or(0)
    }

    /// Writes an unsigned integer.
    pub fn write_uint(&mut self, value: u64) -> usize {
        self.append(|out| int::pack_uint(out, value)).unwrap_or(0)
    }

    /// Writes nil.
    pub fn write_nil(&mut self) -> usize {
        self.append(scalar::pack_nil).unwrap_or(0)
    }

    /// Writes a boolean.
    pub fn write_bool(&mut self, value: bool) -> usize {
        self.append(|out| scalar::pack_bool(out, value)).unwrap_or(0)
    }

    /// Writes a float32.
    pub fn write_float(&mut self, value: f32) -> usize {
        self.append(|out| scalar::pack_float(out, value)).unwrap_or(0)
    }

    /// Writes a float64.
    pub fn write_double(&mut self, value: f64) -> usize {
        self.append(|out| scalar::pack_double(out, value)).unwrap_or(0)
    }

    /// Writes a raw header followed by `payload`.
    pub fn write_raw(&mut self, payload: &[u8]) -> PackResult<usize> {
        let hdr = self.append(|out| container::pack_raw(out, payload.len()))?;
        self.bytes.extend_from_slice(payload);
        Ok(hdr + payload.len())
    }

    /// Writes an array header. Members are written by the caller.
    pub fn write_array(&mut self, count: usize) -> PackResult<usize> {
        self.append(|out| container::pack_array(out, count))
    }

    /// Writes a map header. Keys and values are written by the caller.
    pub fn write_map(&mut self, count: usize) -> PackResult<usize> {
        self.append(|out| container::pack_map(out, count))
    }

    /// Appends bytes that are already packed.
    pub fn write_packed(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }
}
