//! Forward-only event cursor for the evdb event store.
//!
//! A [`Cursor`] walks a buffer of timestamped property maps and decodes each
//! event into a fixed-layout [`Record`] through a table of property
//! descriptors. On top of the event walk it provides idle-gap sessionization
//! and iteration over multiple objects.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Record slots are bounds-checked byte ranges.
//! - **Borrowed input** - The event buffer is never copied; string values are
//!   views into it, and the borrow checker ties them to the binding.
//! - **Two-tier faults** - Structural corruption ends the walk, a bad
//!   property value is skipped.
//! - **Single owner** - A cursor is plain mutable state with no locking;
//!   independent cursors may run on separate threads.
//!
//! # Example
//!
//! ```
//! use cursor::{timestamp, Cursor, EventWriter, Value, ValueKind};
//!
//! let mut writer = EventWriter::new();
//! writer.event(timestamp::from_seconds(1), &[(-1, "signup".into())]).unwrap();
//! let buf = writer.finish();
//!
//! let mut cursor = Cursor::new(-1, 0).unwrap();
//! cursor.set_data_size(20);
//! cursor.set_property(-1, 0, 8, ValueKind::String).unwrap();
//! cursor.set_timestamp_offset(8);
//! cursor.set_ts_offset(12);
//! cursor.set_ptr(&buf);
//!
//! assert!(cursor.next_event_checked());
//! assert_eq!(cursor.timestamp(), 1);
//! assert_eq!(cursor.value(-1), Some(Value::String(b"signup")));
//! assert!(!cursor.next_event_checked());
//! ```

mod config;
mod cursor;
mod descriptor;
pub mod dump;
mod error;
mod event;
mod object;
mod record;
pub mod timestamp;

pub use config::{CursorConfig, PropertyConfig};
pub use cursor::{Cursor, Value};
pub use descriptor::{
    DescriptorTable, PropertyDescriptor, ValueKind, DESCRIPTOR_PADDING, MAX_PROPERTY_SPAN,
};
pub use error::{CursorError, CursorResult, StreamFault};
pub use event::{EventWriter, PropertyValue, EVENT_FLAG};
pub use object::{ObjectList, ObjectSource};
pub use record::{
    Record, StrView, BOOL_WIDTH, DOUBLE_WIDTH, INT_WIDTH, STR_VIEW_WIDTH, TIMESTAMP_WIDTH,
    TS_WIDTH,
};
