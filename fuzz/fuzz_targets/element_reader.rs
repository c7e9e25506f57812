#![no_main]

use libfuzzer_sys::fuzz_target;
use minipack::ElementReader;

fuzz_target!(|data: &[u8]| {
    let mut reader = ElementReader::new(data);
    let mut idx = 0usize;

    // Use input bytes to drive a bounded sequence of reads.
    while idx < data.len() && idx < 1024 {
        let op = data[idx] % 9;
        idx += 1;

        let before = reader.position();
        let ok = match op {
            0 => reader.read_int().is_ok(),
            1 => reader.read_uint().is_ok(),
            2 => reader.read_nil().is_ok(),
            3 => reader.read_bool().is_ok(),
            4 => reader.read_double().is_ok(),
            5 => reader.read_raw().is_ok(),
            6 => reader.read_array().is_ok(),
            7 => reader.read_map().is_ok(),
            _ => reader.skip_elem().is_ok(),
        };
        if !ok {
            assert_eq!(reader.position(), before);
        }
        assert!(reader.position() <= data.len());
    }

    let _ = minipack::sizeof_elem_and_data(data);
});
