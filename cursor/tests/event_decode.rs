//! Event decoding against byte-exact fixtures.

use cursor::{timestamp, Cursor, ValueKind};

const DATA0: &[u8] = b"\xA0\
    \x92\xD3\x00\x00\x00\x00\x00\x00\x00\x00\x84\
    \x01\xA8john doe\
    \x02\xD1\x03\xE8\
    \x03\xCB\x40\x59\x0C\xCC\xCC\xCC\xCC\xCD\
    \x04\xC3\
    \x92\xD3\x00\x00\x00\x00\x00\x10\x00\x00\x85\
    \xFF\xA2A1\
    \xFE\xA5super\
    \xFD\x15\
    \xFC\xCB\x40\x59\x00\x00\x00\x00\x00\x00\
    \xFB\xC3\
    \x92\xD3\x00\x00\x00\x00\x00\x20\x00\x00\x81\
    \xFF\xA2A2\
    \x92\xD3\x00\x00\x00\x00\x00\x30\x00\x00\x84\
    \x01\xADfrank sinatra\
    \x02\x14\
    \x03\xCB\xC0\x59\x00\x00\x00\x00\x00\x00\
    \x04\xC2";

const INT_DATA: &[u8] = b"\xD1\x03\xE8";
const DOUBLE_DATA: &[u8] = b"\xCB\x40\x59\x0C\xCC\xCC\xCC\xCC\xCD";
const BOOLEAN_FALSE_DATA: &[u8] = b"\xC2";
const BOOLEAN_TRUE_DATA: &[u8] = b"\xC3";
const STRING_DATA: &[u8] = b"\xa3foo";

/// Record layout shared by the fixtures.
mod layout {
    pub const ACTION: usize = 0;
    pub const ACTION_STRING: usize = 8;
    pub const ACTION_INT: usize = 16;
    pub const ACTION_DOUBLE: usize = 24;
    pub const ACTION_BOOLEAN: usize = 32;
    pub const OBJECT_STRING: usize = 40;
    pub const OBJECT_INT: usize = 48;
    pub const OBJECT_DOUBLE: usize = 56;
    pub const OBJECT_BOOLEAN: usize = 64;
    pub const TIMESTAMP: usize = 68;
    pub const TS: usize = 72;
    pub const SIZE: usize = 80;
}

/// Secondary layout: a leading dummy word, then one slot per kind.
mod layout2 {
    pub const INT_VALUE: usize = 8;
    pub const DOUBLE_VALUE: usize = 16;
    pub const BOOLEAN_VALUE: usize = 24;
    pub const STRING_VALUE: usize = 32;
    pub const SIZE: usize = 56;
}

#[derive(Debug, PartialEq)]
struct State<'s> {
    ts: i64,
    timestamp: u32,
    action: &'s [u8],
    object_string: &'s [u8],
    object_int: i32,
    object_double: f64,
    object_boolean: bool,
    action_string: &'s [u8],
    action_int: i32,
    action_double: f64,
    action_boolean: bool,
}

fn state<'s>(cursor: &'s Cursor<'_>) -> State<'s> {
    let record = cursor.record();
    State {
        ts: cursor.ts(),
        timestamp: cursor.timestamp(),
        action: cursor.read_str(layout::ACTION),
        object_string: cursor.read_str(layout::OBJECT_STRING),
        object_int: record.read_i32(layout::OBJECT_INT).unwrap(),
        object_double: record.read_f64(layout::OBJECT_DOUBLE).unwrap(),
        object_boolean: record.read_bool(layout::OBJECT_BOOLEAN).unwrap(),
        action_string: cursor.read_str(layout::ACTION_STRING),
        action_int: record.read_i32(layout::ACTION_INT).unwrap(),
        action_double: record.read_f64(layout::ACTION_DOUBLE).unwrap(),
        action_boolean: record.read_bool(layout::ACTION_BOOLEAN).unwrap(),
    }
}

fn expected<'s>(
    ts: i64,
    timestamp: u32,
    action: &'s str,
    object: (&'s str, i32, f64, bool),
    action_data: (&'s str, i32, f64, bool),
) -> State<'s> {
    State {
        ts,
        timestamp,
        action: action.as_bytes(),
        object_string: object.0.as_bytes(),
        object_int: object.1,
        object_double: object.2,
        object_boolean: object.3,
        action_string: action_data.0.as_bytes(),
        action_int: action_data.1,
        action_double: action_data.2,
        action_boolean: action_data.3,
    }
}

fn data0_cursor<'a>() -> Cursor<'a> {
    let mut cursor = Cursor::new(-4, 4).unwrap();
    cursor.set_timestamp_offset(layout::TIMESTAMP);
    cursor.set_ts_offset(layout::TS);
    let properties = [
        (-5, layout::ACTION_BOOLEAN, 1, "boolean"),
        (-4, layout::ACTION_DOUBLE, 8, "float"),
        (-3, layout::ACTION_INT, 4, "integer"),
        (-2, layout::ACTION_STRING, 8, "string"),
        (-1, layout::ACTION, 8, "string"),
        (1, layout::OBJECT_STRING, 8, "string"),
        (2, layout::OBJECT_INT, 4, "integer"),
        (3, layout::OBJECT_DOUBLE, 8, "float"),
        (4, layout::OBJECT_BOOLEAN, 1, "boolean"),
    ];
    for (id, offset, size, kind) in properties {
        cursor
            .set_property(id, offset, size, ValueKind::from_name(kind))
            .unwrap();
    }
    cursor.set_data_size(layout::SIZE);
    cursor
}

#[test]
fn data0_length_matches_fixture() {
    assert_eq!(DATA0.len(), 129);
}

#[test]
fn set_data_walks_four_events() {
    let mut cursor = data0_cursor();
    assert_eq!(cursor.action_data_size(), layout::ACTION_BOOLEAN + 1);

    cursor.set_ptr(DATA0);
    assert_eq!(
        state(&cursor),
        expected(0, 0, "", ("", 0, 0.0, false), ("", 0, 0.0, false))
    );

    // State-only event.
    assert!(cursor.next_event_checked());
    assert_eq!(
        state(&cursor),
        expected(0, 0, "", ("john doe", 1000, 100.2, true), ("", 0, 0.0, false))
    );

    // Action plus action data.
    assert!(cursor.next_event_checked());
    assert_eq!(
        state(&cursor),
        expected(
            timestamp::shift(1_000_000),
            1,
            "A1",
            ("john doe", 1000, 100.2, true),
            ("super", 21, 100.0, true)
        )
    );

    // Action only: action data from the previous event is cleared.
    assert!(cursor.next_event_checked());
    assert_eq!(
        state(&cursor),
        expected(
            timestamp::shift(2_000_000),
            2,
            "A2",
            ("john doe", 1000, 100.2, true),
            ("", 0, 0.0, false)
        )
    );

    // Data only.
    assert!(cursor.next_event_checked());
    assert_eq!(
        state(&cursor),
        expected(
            timestamp::shift(3_000_000),
            3,
            "",
            ("frank sinatra", 20, -100.0, false),
            ("", 0, 0.0, false)
        )
    );

    assert!(!cursor.next_event_checked());
    assert!(cursor.is_eof());
    assert!(cursor.is_eos());
    assert_eq!(cursor.fault(), None);
}

#[test]
fn string_views_point_into_bound_buffer() {
    let mut cursor = data0_cursor();
    cursor.set_ptr(DATA0);
    cursor.next_event();
    let name = cursor.read_str(layout::OBJECT_STRING);
    let offset = name.as_ptr() as usize - DATA0.as_ptr() as usize;
    assert_eq!(&DATA0[offset..offset + 8], b"john doe");
}

#[test]
fn rebind_resets_state() {
    let mut cursor = data0_cursor();
    cursor.set_ptr(DATA0);
    while cursor.next_event_checked() {}
    assert!(cursor.is_eof());

    cursor.set_ptr(DATA0);
    assert!(!cursor.is_eof());
    assert!(!cursor.is_eos());
    assert_eq!(cursor.session_event_index(), -1);
    assert_eq!(
        state(&cursor),
        expected(0, 0, "", ("", 0, 0.0, false), ("", 0, 0.0, false))
    );
    assert!(cursor.next_event_checked());
    assert_eq!(cursor.session_event_index(), 0);
}

#[test]
fn set_integer() {
    let mut cursor = Cursor::new(0, 1).unwrap();
    cursor
        .set_property(1, layout2::INT_VALUE, 4, ValueKind::Integer)
        .unwrap();
    cursor.set_data_size(layout2::SIZE);
    assert_eq!(cursor.property(1).unwrap().offset, 8);
    cursor.set_ptr(INT_DATA);
    assert_eq!(cursor.set_value(1, 0), Some(3));
    assert_eq!(cursor.record().read_i32(layout2::INT_VALUE), Some(1000));
}

#[test]
fn set_double() {
    let mut cursor = Cursor::new(-1, 0).unwrap();
    cursor
        .set_property(-1, layout2::DOUBLE_VALUE, 8, ValueKind::Float)
        .unwrap();
    cursor.set_data_size(layout2::SIZE);
    assert_eq!(cursor.property(-1).unwrap().offset, 16);
    cursor.set_ptr(DOUBLE_DATA);
    assert_eq!(cursor.set_value(-1, 0), Some(9));
    let value = cursor.record().read_f64(layout2::DOUBLE_VALUE).unwrap();
    assert!((value - 100.2).abs() < 0.1);
}

#[test]
fn set_boolean() {
    let mut cursor = Cursor::new(0, 2).unwrap();
    cursor
        .set_property(2, layout2::BOOLEAN_VALUE, 1, ValueKind::Boolean)
        .unwrap();
    cursor.set_data_size(layout2::SIZE);
    assert_eq!(cursor.property(2).unwrap().offset, 24);

    cursor.set_ptr(BOOLEAN_TRUE_DATA);
    assert_eq!(cursor.set_value(2, 0), Some(1));
    assert_eq!(cursor.record().read_bool(layout2::BOOLEAN_VALUE), Some(true));

    cursor.set_ptr(BOOLEAN_FALSE_DATA);
    assert_eq!(cursor.set_value(2, 0), Some(1));
    assert_eq!(
        cursor.record().read_bool(layout2::BOOLEAN_VALUE),
        Some(false)
    );
}

#[test]
fn set_string() {
    let mut cursor = Cursor::new(0, 1).unwrap();
    cursor.set_data_size(layout2::SIZE);
    cursor
        .set_property(1, layout2::STRING_VALUE, 8, ValueKind::String)
        .unwrap();
    assert_eq!(cursor.property(1).unwrap().offset, 32);
    cursor.set_ptr(STRING_DATA);
    assert_eq!(cursor.set_value(1, 0), Some(4));

    let view = cursor
        .record()
        .read_str_view(layout2::STRING_VALUE)
        .unwrap();
    assert_eq!(view.len, 3);
    assert_eq!(view.start, 1);
    assert_eq!(
        cursor.read_str(layout2::STRING_VALUE).as_ptr(),
        STRING_DATA[1..].as_ptr()
    );
}

#[test]
fn noop_property_measures_and_skips() {
    let mut cursor = Cursor::new(0, 1).unwrap();
    cursor.set_property(1, 0, 0, ValueKind::from_name("")).unwrap();
    cursor.set_data_size(8);
    cursor.set_ptr(STRING_DATA);
    assert_eq!(cursor.set_value(1, 0), Some(4));
    assert_eq!(cursor.value(1), None);
    assert_eq!(cursor.record().as_bytes(), &[0u8; 8]);
}
