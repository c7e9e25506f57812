use minipack::{
    pack_int, pack_raw_bytes, pack_uint, sizeof_elem_and_data, sizeof_int, sizeof_uint,
    unpack_bool, unpack_double, unpack_int, unpack_raw_bytes, unpack_uint, ElementReader,
    ElementWriter, MAX_SCALAR_SIZE,
};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Int(i64),
    UInt(u64),
    Bool(bool),
    Double(f64),
    Raw(Vec<u8>),
    Nil,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<i64>().prop_map(Op::Int),
        any::<u64>().prop_map(Op::UInt),
        any::<bool>().prop_map(Op::Bool),
        any::<f64>()
            .prop_filter("nan never compares equal", |v| !v.is_nan())
            .prop_map(Op::Double),
        prop::collection::vec(any::<u8>(), 0..80).prop_map(Op::Raw),
        Just(Op::Nil),
    ]
}

/// Smallest class for an unsigned value, from first principles.
fn expected_uint_size(value: u64) -> usize {
    match value {
        0..=0x7F => 1,
        0x80..=0xFF => 2,
        0x100..=0xFFFF => 3,
        0x1_0000..=0xFFFF_FFFF => 5,
        _ => 9,
    }
}

fn expected_int_size(value: i64) -> usize {
    if (-32..=127).contains(&value) {
        1
    } else if i8::try_from(value).is_ok() {
        2
    } else if i16::try_from(value).is_ok() {
        3
    } else if i32::try_from(value).is_ok() {
        5
    } else {
        9
    }
}

proptest! {
    #[test]
    fn prop_int_roundtrip_is_minimal(value in any::<i64>()) {
        let mut buf = [0u8; MAX_SCALAR_SIZE];
        let size = pack_int(&mut buf, value).unwrap();
        prop_assert_eq!(size, sizeof_int(value));
        prop_assert_eq!(size, expected_int_size(value));
        prop_assert_eq!(unpack_int(&buf[..size]).unwrap(), (value, size));
    }

    #[test]
    fn prop_uint_roundtrip_is_minimal(value in any::<u64>()) {
        let mut buf = [0u8; MAX_SCALAR_SIZE];
        let size = pack_uint(&mut buf, value).unwrap();
        prop_assert_eq!(size, sizeof_uint(value));
        prop_assert_eq!(size, expected_uint_size(value));
        prop_assert_eq!(unpack_uint(&buf[..size]).unwrap(), (value, size));
        prop_assert_eq!(sizeof_elem_and_data(&buf[..size]).unwrap(), size);
    }

    #[test]
    fn prop_raw_roundtrip(payload in prop::collection::vec(any::<u8>(), 0..300)) {
        let mut buf = vec![0u8; payload.len() + 5];
        let size = pack_raw_bytes(&mut buf, &payload).unwrap();
        let (bytes, total) = unpack_raw_bytes(&buf).unwrap();
        prop_assert_eq!(bytes, &payload[..]);
        prop_assert_eq!(total, size);
        prop_assert_eq!(sizeof_elem_and_data(&buf[..size]).unwrap(), size);
    }

    #[test]
    fn prop_mismatch_never_succeeds(tag in any::<u8>()) {
        let buf = [tag, 0, 0, 0, 0, 0, 0, 0, 0];
        if unpack_bool(&buf).is_ok() {
            prop_assert!(tag == 0xC2 || tag == 0xC3);
        }
        if unpack_double(&buf).is_ok() {
            prop_assert_eq!(tag, 0xCB);
        }
    }

    #[test]
    fn prop_writer_reader_sequence(ops in prop::collection::vec(op_strategy(), 1..48)) {
        let mut writer = ElementWriter::new();
        for op in &ops {
            match op {
                Op::Int(v) => { writer.write_int(*v); }
                Op::UInt(v) => { writer.write_uint(*v); }
                Op::Bool(v) => { writer.write_bool(*v); }
                Op::Double(v) => { writer.write_double(*v); }
                Op::Raw(v) => { writer.write_raw(v).unwrap(); }
                Op::Nil => { writer.write_nil(); }
            }
        }
        let bytes = writer.finish();

        let mut reader = ElementReader::new(&bytes);
        for op in &ops {
            match op {
                Op::Int(v) => prop_assert_eq!(reader.read_int().unwrap(), *v),
                Op::UInt(v) => prop_assert_eq!(reader.read_uint().unwrap(), *v),
                Op::Bool(v) => prop_assert_eq!(reader.read_bool().unwrap(), *v),
                Op::Double(v) => prop_assert_eq!(reader.read_double().unwrap().to_bits(), v.to_bits()),
                Op::Raw(v) => prop_assert_eq!(reader.read_raw().unwrap(), &v[..]),
                Op::Nil => reader.read_nil().unwrap(),
            }
        }
        prop_assert!(reader.is_empty());
    }

    #[test]
    fn prop_skip_never_panics(data in prop::collection::vec(any::<u8>(), 0..64)) {
        let mut reader = ElementReader::new(&data);
        while !reader.is_empty() {
            if reader.skip_elem().is_err() {
                break;
            }
        }
    }
}
