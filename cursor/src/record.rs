//! Fixed-size output record.
//!
//! The record is a caller-shaped byte arena. Values are stored at
//! descriptor offsets in native byte order. Every access is bounds-checked:
//! out-of-range writes are dropped and out-of-range reads return `None`.

/// Width of an integer slot.
pub const INT_WIDTH: usize = 4;
/// Width of a float slot.
pub const DOUBLE_WIDTH: usize = 8;
/// Width of a boolean slot.
pub const BOOL_WIDTH: usize = 1;
/// Width of a string view slot.
pub const STR_VIEW_WIDTH: usize = 8;
/// Width of the seconds timestamp slot.
pub const TIMESTAMP_WIDTH: usize = 4;
/// Width of the shifted timestamp slot.
pub const TS_WIDTH: usize = 8;

/// A zero-copy reference to a byte range of the bound buffer.
///
/// Stored in the record as two `u32`s. A cleared view is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StrView {
    pub start: u32,
    pub len: u32,
}

impl StrView {
    /// Creates a view over `len` bytes starting at `start`, if both fit in
    /// 32 bits.
    #[must_use]
    pub fn new(start: usize, len: usize) -> Option<Self> {
        Some(Self {
            start: u32::try_from(start).ok()?,
            len: u32::try_from(len).ok()?,
        })
    }

    /// Returns the viewed range within `buf`, or an empty slice if the range
    /// lies outside it.
    #[must_use]
    pub fn resolve(self, buf: &[u8]) -> &[u8] {
        let start = self.start as usize;
        let end = start.saturating_add(self.len as usize);
        buf.get(start..end).unwrap_or_default()
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }
}

/// Owned record bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    bytes: Vec<u8>,
}

impl Record {
    /// Creates a zeroed record of `size` bytes.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![0; size],
        }
    }

    /// Reallocates the record to exactly `size` zeroed bytes.
    pub fn reset(&mut self, size: usize) {
        self.bytes = vec![0; size];
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Zeroes the whole record.
    pub fn zero(&mut self) {
        self.bytes.fill(0);
    }

    /// Zeroes the first `len` bytes (clamped to the record size).
    pub fn zero_prefix(&mut self, len: usize) {
        let len = len.min(self.bytes.len());
        self.bytes[..len].fill(0);
    }

    /// Returns `true` if a slot of `width` bytes at `offset` fits.
    #[must_use]
    pub fn fits(&self, offset: usize, width: usize) -> bool {
        offset
            .checked_add(width)
            .is_some_and(|end| end <= self.bytes.len())
    }

    fn slot<const N: usize>(&self, offset: usize) -> Option<[u8; N]> {
        let bytes = self.bytes.get(offset..offset.checked_add(N)?)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Some(out)
    }

    fn put<const N: usize>(&mut self, offset: usize, value: [u8; N]) {
        let Some(end) = offset.checked_add(N) else {
            return;
        };
        if let Some(slot) = self.bytes.get_mut(offset..end) {
            slot.copy_from_slice(&value);
        }
    }

    pub fn write_i32(&mut self, offset: usize, value: i32) {
        self.put(offset, value.to_ne_bytes());
    }

    pub fn write_u32(&mut self, offset: usize, value: u32) {
        self.put(offset, value.to_ne_bytes());
    }

    pub fn write_i64(&mut self, offset: usize, value: i64) {
        self.put(offset, value.to_ne_bytes());
    }

    pub fn write_f64(&mut self, offset: usize, value: f64) {
        self.put(offset, value.to_ne_bytes());
    }

    pub fn write_bool(&mut self, offset: usize, value: bool) {
        self.put(offset, [u8::from(value)]);
    }

    pub fn write_str_view(&mut self, offset: usize, view: StrView) {
        let mut bytes = [0u8; STR_VIEW_WIDTH];
        bytes[..4].copy_from_slice(&view.start.to_ne_bytes());
        bytes[4..].copy_from_slice(&view.len.to_ne_bytes());
        self.put(offset, bytes);
    }

    #[must_use]
    pub fn read_i32(&self, offset: usize) -> Option<i32> {
        self.slot(offset).map(i32::from_ne_bytes)
    }

    #[must_use]
    pub fn read_u32(&self, offset: usize) -> Option<u32> {
        self.slot(offset).map(u32::from_ne_bytes)
    }

    #[must_use]
    pub fn read_i64(&self, offset: usize) -> Option<i64> {
        self.slot(offset).map(i64::from_ne_bytes)
    }

    #[must_use]
    pub fn read_f64(&self, offset: usize) -> Option<f64> {
        self.slot(offset).map(f64::from_ne_bytes)
    }

    /// Reads a boolean; any non-zero byte is `true`.
    #[must_use]
    pub fn read_bool(&self, offset: usize) -> Option<bool> {
        self.slot::<1>(offset).map(|[byte]| byte != 0)
    }

    #[must_use]
    pub fn read_str_view(&self, offset: usize) -> Option<StrView> {
        let bytes = self.slot::<STR_VIEW_WIDTH>(offset)?;
        let [a, b, c, d, e, f, g, h] = bytes;
        Some(StrView {
            start: u32::from_ne_bytes([a, b, c, d]),
            len: u32::from_ne_bytes([e, f, g, h]),
        })
    }
}
