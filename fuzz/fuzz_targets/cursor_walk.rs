#![no_main]

use cursor::{Cursor, ValueKind};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&idle, events)) = data.split_first() else {
        return;
    };

    let Ok(mut cursor) = Cursor::new(-2, 2) else {
        return;
    };
    let _ = cursor.set_property(-2, 0, 8, ValueKind::String);
    let _ = cursor.set_property(-1, 8, 4, ValueKind::Integer);
    let _ = cursor.set_property(1, 12, 8, ValueKind::Float);
    let _ = cursor.set_property(2, 20, 1, ValueKind::Boolean);
    let _ = cursor.set_property(3, 0, 0, ValueKind::Noop);
    cursor.set_timestamp_offset(24);
    cursor.set_ts_offset(32);
    cursor.set_data_size(40);

    cursor.set_ptr(events);
    cursor.set_session_idle(u32::from(idle % 16));
    while cursor.next_session_checked() {
        while cursor.next_event_checked() {
            let view = cursor.read_str(0);
            assert!(view.len() <= events.len());
            let _ = cursor.value(-1);
            let _ = cursor.value(1);
        }
    }
    assert!(cursor.is_eof());
});
