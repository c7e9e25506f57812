//! The event cursor and its session state machine.

use std::fmt;

use minipack::{
    is_raw, sizeof_elem_and_data, unpack_int, unpack_map, unpack_nil, ElementReader,
};
use tracing::{debug, trace, warn};

use crate::config::CursorConfig;
use crate::descriptor::{DescriptorTable, PropertyDescriptor, ValueKind};
use crate::dump;
use crate::error::{CursorError, CursorResult, StreamFault};
use crate::event::EVENT_FLAG;
use crate::object::ObjectSource;
use crate::record::Record;
use crate::timestamp;

/// Bytes shown in the dump emitted for a stream fault.
const FAULT_DUMP_BYTES: usize = 64;

/// A decoded property value borrowed from the cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'c> {
    String(&'c [u8]),
    Integer(i32),
    Float(f64),
    Boolean(bool),
}

/// Forward-only decoder of an event buffer into a fixed-layout record.
///
/// The cursor borrows the bound buffer for `'a`. String values are views
/// into that buffer; reading them borrows the cursor, so a rebind (which
/// needs `&mut self`) cannot outlive a view.
pub struct Cursor<'a> {
    buf: &'a [u8],
    /// Offset of the next unread event.
    pos: usize,
    eof: bool,
    in_session: bool,
    last_timestamp: u32,
    session_idle_secs: u32,
    session_event_index: i32,
    fault: Option<StreamFault>,

    descriptors: DescriptorTable,
    record: Record,
    timestamp_offset: usize,
    ts_offset: usize,
    /// Leading record bytes zeroed before every event.
    action_data_size: usize,

    object_source: Option<Box<dyn ObjectSource<'a> + Send + 'a>>,
}

impl<'a> Cursor<'a> {
    /// Creates an unbound cursor for property ids in `[min_id, max_id]`.
    ///
    /// The cursor starts at eof with an empty record.
    pub fn new(min_id: i32, max_id: i32) -> CursorResult<Self> {
        Ok(Self {
            buf: &[],
            pos: 0,
            eof: true,
            in_session: false,
            last_timestamp: 0,
            session_idle_secs: 0,
            session_event_index: -1,
            fault: None,
            descriptors: DescriptorTable::new(min_id, max_id)?,
            record: Record::default(),
            timestamp_offset: 0,
            ts_offset: 0,
            action_data_size: 0,
            object_source: None,
        })
    }

    /// Builds and configures a cursor from a validated config.
    ///
    /// `session_idle_secs` is not applied here: every bind clears the
    /// threshold, so re-arm it with [`set_session_idle`](Self::set_session_idle)
    /// after [`set_ptr`](Self::set_ptr).
    pub fn from_config(config: &CursorConfig) -> CursorResult<Self> {
        config.validate()?;
        let mut cursor = Self::new(config.min_property_id, config.max_property_id)?;
        cursor.set_data_size(config.data_size);
        cursor.set_timestamp_offset(config.timestamp_offset);
        cursor.set_ts_offset(config.ts_offset);
        for property in &config.properties {
            cursor.set_property(
                property.id,
                property.offset,
                property.size,
                property.value_kind(),
            )?;
        }
        Ok(cursor)
    }

    //--------------------------------------
    // Configuration
    //--------------------------------------

    /// Installs the descriptor for `id`.
    ///
    /// Negative (action) ids extend the region zeroed between events to
    /// cover `offset + size`.
    pub fn set_property(
        &mut self,
        id: i64,
        offset: usize,
        size: usize,
        kind: ValueKind,
    ) -> CursorResult<()> {
        self.descriptors
            .set(id, PropertyDescriptor::new(offset, kind))?;
        let end = offset.saturating_add(size);
        if id < 0 && end > self.action_data_size {
            self.action_data_size = end;
        }
        Ok(())
    }

    /// Reallocates the record to exactly `size` zeroed bytes.
    #[doc(alias = "set_data_sz")]
    pub fn set_data_size(&mut self, size: usize) {
        self.record.reset(size);
    }

    /// Sets where the seconds timestamp (`u32`) is written.
    pub fn set_timestamp_offset(&mut self, offset: usize) {
        self.timestamp_offset = offset;
    }

    /// Sets where the raw shifted timestamp (`i64`) is written.
    pub fn set_ts_offset(&mut self, offset: usize) {
        self.ts_offset = offset;
    }

    /// Sets the idle gap, in seconds, that ends a session.
    ///
    /// A non-zero threshold takes the cursor out of session: call
    /// [`next_session`](Self::next_session) before reading events. Zero
    /// disables sessionization and resumes unless at eof.
    pub fn set_session_idle(&mut self, seconds: u32) {
        self.session_idle_secs = seconds;
        self.in_session = seconds == 0 && !self.eof;
    }

    /// Installs the operation used by [`next_object`](Self::next_object).
    pub fn set_object_source(&mut self, source: impl ObjectSource<'a> + Send + 'a) {
        self.object_source = Some(Box::new(source));
    }

    //--------------------------------------
    // Binding
    //--------------------------------------

    /// Binds a new event buffer and resets all walking state.
    ///
    /// Sessionization is disabled and the record is zeroed. A leading raw
    /// element holds the object's state and is skipped.
    pub fn set_ptr(&mut self, buf: &'a [u8]) {
        self.buf = buf;
        self.pos = 0;
        self.eof = buf.is_empty();
        self.in_session = true;
        self.last_timestamp = 0;
        self.session_idle_secs = 0;
        self.session_event_index = -1;
        self.fault = None;
        self.record.zero();

        if is_raw(buf) {
            self.pos = sizeof_elem_and_data(buf).unwrap_or_else(|err| {
                debug!(error = %err, len = buf.len(), "truncated state blob");
                buf.len()
            });
        }
    }

    //--------------------------------------
    // Iteration
    //--------------------------------------

    /// Decodes the next event into the record.
    ///
    /// Does nothing at eof or outside a session. An event that starts after
    /// an idle gap is left unread and ends the session. A property value that
    /// runs past the buffer keeps the event but ends the walk after it.
    pub fn next_event(&mut self) {
        if self.eof || !self.in_session {
            return;
        }
        let buf = self.buf;
        let start = self.pos;

        let Some(&flag) = buf.get(start) else {
            trace!(len = buf.len(), "end of event buffer");
            self.eof = true;
            self.in_session = false;
            self.pos = buf.len();
            return;
        };
        if flag != EVENT_FLAG {
            return self.stream_fault(StreamFault::EventFlag { found: flag }, start);
        }
        let mut pos = start + 1;

        let Ok((ts, size)) = unpack_int(&buf[pos..]) else {
            return self.stream_fault(StreamFault::Timestamp, pos);
        };
        pos += size;
        let timestamp = timestamp::to_seconds(ts);

        // No idle check until a non-zero timestamp has been seen.
        let idle = self.last_timestamp > 0
            && self.session_idle_secs > 0
            && timestamp.wrapping_sub(self.last_timestamp) >= self.session_idle_secs;
        self.last_timestamp = timestamp;
        if idle {
            trace!(timestamp, index = self.session_event_index, "session idle gap");
            self.in_session = false;
            return;
        }

        self.session_event_index += 1;
        self.record.write_i64(self.ts_offset, ts);
        self.record.write_u32(self.timestamp_offset, timestamp);
        // Timestamp slots inside the action region are cleared too.
        self.record.zero_prefix(self.action_data_size);

        let count = match unpack_map(&buf[pos..]) {
            Ok((count, size)) => {
                pos += size;
                count
            }
            Err(_) => match unpack_nil(&buf[pos..]) {
                Ok(size) => {
                    pos += size;
                    0
                }
                Err(_) => return self.stream_fault(StreamFault::DataMap, pos),
            },
        };

        for _ in 0..count {
            let Ok((key, size)) = unpack_int(&buf[pos..]) else {
                return self.stream_fault(StreamFault::Key, pos);
            };
            pos += size;

            let size = match self.descriptors.get(key).set(&mut self.record, buf, pos) {
                Some(size) => size,
                None => match ElementReader::new(&buf[pos..]).skip_elem() {
                    Ok(size) => {
                        debug!(key, pos, "invalid value, skipping");
                        size
                    }
                    Err(_) => return self.truncated_value(key, pos),
                },
            };
            pos += size;
        }

        self.pos = pos;
    }

    /// Keeps the current event; the next call reaches eof.
    fn truncated_value(&mut self, key: i64, pos: usize) {
        self.record_fault(StreamFault::Value { key }, pos);
        self.pos = self.buf.len();
    }

    fn stream_fault(&mut self, fault: StreamFault, pos: usize) {
        self.record_fault(fault, pos);
        self.eof = true;
    }

    fn record_fault(&mut self, fault: StreamFault, pos: usize) {
        warn!(%fault, pos, len = self.buf.len(), "corrupt event stream");
        dump::dump(self.buf, pos, FAULT_DUMP_BYTES);
        self.fault = Some(fault);
    }

    /// Advances to the next event and reports whether one was decoded.
    pub fn next_event_checked(&mut self) -> bool {
        self.next_event();
        !self.eof && self.in_session
    }

    /// Starts the next session if the current one has ended.
    pub fn next_session(&mut self) {
        if !self.in_session {
            self.session_event_index = -1;
            self.in_session = !self.eof;
            trace!(in_session = self.in_session, "next session");
        }
    }

    /// Starts the next session and reports whether events may remain.
    pub fn next_session_checked(&mut self) -> bool {
        self.next_session();
        !self.eof
    }

    /// Asks the object source to bind the next object.
    ///
    /// Returns `false` when no source is installed or the source is done.
    pub fn next_object(&mut self) -> bool {
        let Some(mut source) = self.object_source.take() else {
            return false;
        };
        let found = source.next_object(self);
        if self.object_source.is_none() {
            self.object_source = Some(source);
        }
        found
    }

    //--------------------------------------
    // State
    //--------------------------------------

    #[must_use]
    pub const fn is_eof(&self) -> bool {
        self.eof
    }

    /// Returns `true` when the cursor is outside a session.
    #[must_use]
    pub const fn is_eos(&self) -> bool {
        !self.in_session
    }

    /// Position of the current event within its session; -1 before the
    /// first.
    #[must_use]
    pub const fn session_event_index(&self) -> i32 {
        self.session_event_index
    }

    #[must_use]
    pub const fn session_idle(&self) -> u32 {
        self.session_idle_secs
    }

    /// The fault that stopped the walk, if any.
    #[must_use]
    pub const fn fault(&self) -> Option<StreamFault> {
        self.fault
    }

    /// Size of the region zeroed before every event.
    #[must_use]
    pub const fn action_data_size(&self) -> usize {
        self.action_data_size
    }

    #[must_use]
    pub const fn descriptors(&self) -> &DescriptorTable {
        &self.descriptors
    }

    //--------------------------------------
    // Data
    //--------------------------------------

    /// Decodes the element at `pos` of the bound buffer into `id`'s slot.
    ///
    /// Returns the element size, or `None` if it does not match the kind.
    pub fn set_value(&mut self, id: i64, pos: usize) -> Option<usize> {
        self.descriptors.get(id).set(&mut self.record, self.buf, pos)
    }

    /// Applies the clear operation of every declared property.
    pub fn clear_data(&mut self) {
        for (_, descriptor) in self.descriptors.declared() {
            descriptor.clear(&mut self.record);
        }
    }

    #[must_use]
    pub const fn record(&self) -> &Record {
        &self.record
    }

    /// Seconds timestamp of the current event.
    #[must_use]
    pub fn timestamp(&self) -> u32 {
        self.record.read_u32(self.timestamp_offset).unwrap_or(0)
    }

    /// Shifted timestamp of the current event.
    #[must_use]
    pub fn ts(&self) -> i64 {
        self.record.read_i64(self.ts_offset).unwrap_or(0)
    }

    /// Resolves the string view at `offset` against the bound buffer.
    #[must_use]
    pub fn read_str(&self, offset: usize) -> &[u8] {
        self.record
            .read_str_view(offset)
            .map(|view| view.resolve(self.buf))
            .unwrap_or_default()
    }

    /// Returns the declared descriptor for `id`.
    pub fn property(&self, id: i64) -> CursorResult<&PropertyDescriptor> {
        let descriptor = self.descriptors.get(id);
        if descriptor.is_declared() {
            Ok(descriptor)
        } else {
            Err(CursorError::UnknownProperty { id })
        }
    }

    /// Reads the current value of a declared property.
    ///
    /// Returns `None` for undeclared or skipped properties.
    #[must_use]
    pub fn value(&self, id: i64) -> Option<Value<'_>> {
        let descriptor = self.property(id).ok()?;
        let offset = descriptor.offset;
        match descriptor.kind {
            ValueKind::String => Some(Value::String(self.read_str(offset))),
            ValueKind::Integer => self.record.read_i32(offset).map(Value::Integer),
            ValueKind::Float => self.record.read_f64(offset).map(Value::Float),
            ValueKind::Boolean => self.record.read_bool(offset).map(Value::Boolean),
            ValueKind::Noop => None,
        }
    }
}

impl fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("len", &self.buf.len())
            .field("pos", &self.pos)
            .field("eof", &self.eof)
            .field("in_session", &self.in_session)
            .field("last_timestamp", &self.last_timestamp)
            .field("session_idle_secs", &self.session_idle_secs)
            .field("session_event_index", &self.session_event_index)
            .field("fault", &self.fault)
            .field("data_size", &self.record.len())
            .field("action_data_size", &self.action_data_size)
            .field("object_source", &self.object_source.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventWriter;

    fn int_cursor<'a>() -> Cursor<'a> {
        let mut cursor = Cursor::new(-1, 1).unwrap();
        cursor.set_data_size(20);
        cursor.set_property(-1, 0, 4, ValueKind::Integer).unwrap();
        cursor.set_property(1, 4, 4, ValueKind::Integer).unwrap();
        cursor.set_timestamp_offset(8);
        cursor.set_ts_offset(12);
        cursor
    }

    #[test]
    fn unbound_cursor_is_eof() {
        let mut cursor = int_cursor();
        assert!(cursor.is_eof());
        assert!(!cursor.next_event_checked());
        assert!(!cursor.next_session_checked());
    }

    #[test]
    fn action_region_tracks_negative_ids() {
        let cursor = int_cursor();
        assert_eq!(cursor.action_data_size(), 4);
    }

    #[test]
    fn bad_flag_is_terminal() {
        let buf = b"\x91\x00\xC0";
        let mut cursor = int_cursor();
        cursor.set_ptr(buf);
        assert!(!cursor.next_event_checked());
        assert!(cursor.is_eof());
        assert_eq!(cursor.fault(), Some(StreamFault::EventFlag { found: 0x91 }));
    }

    #[test]
    fn nil_data_map_is_empty_event() {
        let mut writer = EventWriter::new();
        writer.empty_event(timestamp::from_seconds(7));
        let buf = writer.finish();
        let mut cursor = int_cursor();
        cursor.set_ptr(&buf);
        assert!(cursor.next_event_checked());
        assert_eq!(cursor.timestamp(), 7);
        assert_eq!(cursor.ts(), timestamp::from_seconds(7));
        assert!(!cursor.next_event_checked());
        assert_eq!(cursor.fault(), None);
    }

    #[test]
    fn set_value_decodes_in_place() {
        let buf = b"\xD1\x03\xE8";
        let mut cursor = int_cursor();
        cursor.set_ptr(buf);
        assert_eq!(cursor.set_value(1, 0), Some(3));
        assert_eq!(cursor.value(1), Some(Value::Integer(1000)));
        assert_eq!(cursor.set_value(1, 3), None);
    }

    #[test]
    fn clear_data_resets_declared_slots() {
        let buf = b"\x05";
        let mut cursor = int_cursor();
        cursor.set_ptr(buf);
        cursor.set_value(-1, 0).unwrap();
        cursor.set_value(1, 0).unwrap();
        cursor.clear_data();
        assert_eq!(cursor.value(-1), Some(Value::Integer(0)));
        assert_eq!(cursor.value(1), Some(Value::Integer(0)));
    }

    #[test]
    fn unknown_property_is_reported() {
        let cursor = int_cursor();
        assert_eq!(
            cursor.property(0).unwrap_err(),
            CursorError::UnknownProperty { id: 0 }
        );
        assert_eq!(cursor.value(0), None);
    }

    #[test]
    fn next_object_without_source_is_false() {
        let mut cursor = int_cursor();
        assert!(!cursor.next_object());
    }

    #[test]
    fn timestamps_inside_action_region_are_cleared() {
        let mut writer = EventWriter::new();
        writer.event(timestamp::from_seconds(5), &[]).unwrap();
        let buf = writer.finish();

        let mut cursor = Cursor::new(-1, 0).unwrap();
        cursor.set_data_size(16);
        cursor.set_property(-1, 12, 4, ValueKind::Integer).unwrap();
        cursor.set_timestamp_offset(0);
        cursor.set_ts_offset(4);
        cursor.set_ptr(&buf);

        assert!(cursor.next_event_checked());
        assert_eq!(cursor.timestamp(), 0);
        assert_eq!(cursor.ts(), 0);
    }

    #[test]
    fn cursor_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Cursor<'static>>();
    }

    #[test]
    fn debug_omits_buffer_bytes() {
        let cursor = int_cursor();
        let text = format!("{cursor:?}");
        assert!(text.contains("eof: true"));
    }
}
