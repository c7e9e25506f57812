//! Event buffer framing.
//!
//! An event buffer is an optional leading raw element (the object's current
//! state, never decoded as an event) followed by events. Each event is the
//! flag byte, a packed signed timestamp, and a packed map (or nil) from
//! signed property ids to packed values.

use minipack::{ElementWriter, PackResult};

/// Leading byte of every event.
pub const EVENT_FLAG: u8 = 0x92;

/// A property value to pack into an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue<'v> {
    String(&'v str),
    Bytes(&'v [u8]),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Nil,
}

impl<'v> From<&'v str> for PropertyValue<'v> {
    fn from(value: &'v str) -> Self {
        Self::String(value)
    }
}

impl From<i64> for PropertyValue<'_> {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for PropertyValue<'_> {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for PropertyValue<'_> {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// Builds event buffers.
///
/// Timestamps are packed in the smallest integer class. Use
/// [`timestamp::from_seconds`](crate::timestamp::from_seconds) or
/// [`timestamp::shift`](crate::timestamp::shift) to build them.
#[derive(Debug, Default)]
pub struct EventWriter {
    writer: ElementWriter,
}

impl EventWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a buffer with a leading state blob.
    pub fn with_state(state: &[u8]) -> PackResult<Self> {
        let mut writer = ElementWriter::new();
        writer.write_raw(state)?;
        Ok(Self { writer })
    }

    /// Appends one event.
    pub fn event(&mut self, ts: i64, properties: &[(i64, PropertyValue<'_>)]) -> PackResult<()> {
        self.writer.write_packed(&[EVENT_FLAG]);
        self.writer.write_int(ts);
        self.writer.write_map(properties.len())?;
        for (id, value) in properties {
            self.writer.write_int(*id);
            match *value {
                PropertyValue::String(s) => {
                    self.writer.write_raw(s.as_bytes())?;
                }
                PropertyValue::Bytes(b) => {
                    self.writer.write_raw(b)?;
                }
                PropertyValue::Integer(v) => {
                    self.writer.write_int(v);
                }
                PropertyValue::Float(v) => {
                    self.writer.write_double(v);
                }
                PropertyValue::Boolean(v) => {
                    self.writer.write_bool(v);
                }
                PropertyValue::Nil => {
                    self.writer.write_nil();
                }
            }
        }
        Ok(())
    }

    /// Appends an event whose data is nil instead of a map.
    pub fn empty_event(&mut self, ts: i64) {
        self.writer.write_packed(&[EVENT_FLAG]);
        self.writer.write_int(ts);
        self.writer.write_nil();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.writer.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writer.is_empty()
    }

    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.writer.finish()
    }
}
