//! Byte-exact layouts at every size-class boundary.

use minipack::{
    pack_array, pack_int, pack_map, pack_raw, pack_uint, unpack_array, unpack_int, unpack_map,
    unpack_raw, unpack_uint, Format, PackError,
};

fn packed_int(value: i64) -> Vec<u8> {
    let mut buf = [0u8; 9];
    let size = pack_int(&mut buf, value).unwrap();
    buf[..size].to_vec()
}

fn packed_uint(value: u64) -> Vec<u8> {
    let mut buf = [0u8; 9];
    let size = pack_uint(&mut buf, value).unwrap();
    buf[..size].to_vec()
}

#[test]
fn unsigned_boundaries() {
    assert_eq!(packed_uint(0), [0x00]);
    assert_eq!(packed_uint(127), [0x7F]);
    assert_eq!(packed_uint(128), [0xCC, 0x80]);
    assert_eq!(packed_uint(255), [0xCC, 0xFF]);
    assert_eq!(packed_uint(256), [0xCD, 0x01, 0x00]);
    assert_eq!(packed_uint(65_535), [0xCD, 0xFF, 0xFF]);
    assert_eq!(packed_uint(65_536), [0xCE, 0x00, 0x01, 0x00, 0x00]);
    assert_eq!(
        packed_uint(u64::MAX),
        [0xCF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]
    );
}

#[test]
fn signed_boundaries() {
    assert_eq!(packed_int(-1), [0xFF]);
    assert_eq!(packed_int(-32), [0xE0]);
    assert_eq!(packed_int(-33), [0xD0, 0xDF]);
    assert_eq!(packed_int(i64::from(i8::MIN)), [0xD0, 0x80]);
    assert_eq!(packed_int(128), [0xD1, 0x00, 0x80]);
    assert_eq!(packed_int(1000), [0xD1, 0x03, 0xE8]);
    assert_eq!(packed_int(i64::from(i16::MIN)), [0xD1, 0x80, 0x00]);
    assert_eq!(packed_int(65_536), [0xD2, 0x00, 0x01, 0x00, 0x00]);
    assert_eq!(packed_int(i64::MIN)[0], 0xD3);
}

#[test]
fn timestamps_use_int64_above_32_bits() {
    let ts = 3i64 << 40;
    let bytes = packed_int(ts);
    assert_eq!(bytes.len(), 9);
    assert_eq!(unpack_int(&bytes).unwrap(), (ts, 9));
}

#[test]
fn uint64_above_i64_max_wraps_as_int() {
    let bytes = packed_uint(u64::MAX);
    assert_eq!(unpack_int(&bytes).unwrap(), (-1, 9));
    assert_eq!(unpack_uint(&bytes).unwrap(), (u64::MAX, 9));
}

#[test]
fn container_header_boundaries() {
    let mut buf = [0u8; 5];
    for (count, size, tag) in [
        (15usize, 1usize, 0x9F_u8),
        (16, 3, 0xDC),
        (65_535, 3, 0xDC),
        (65_536, 5, 0xDD),
    ] {
        assert_eq!(pack_array(&mut buf, count).unwrap(), size);
        assert_eq!(buf[0], tag);
        assert_eq!(unpack_array(&buf).unwrap(), (count as u32, size));
    }

    assert_eq!(pack_map(&mut buf, 16).unwrap(), 3);
    assert_eq!(&buf[..3], &[0xDE, 0x00, 0x10]);
    assert_eq!(unpack_map(&buf).unwrap(), (16, 3));

    assert_eq!(pack_raw(&mut buf, 31).unwrap(), 1);
    assert_eq!(buf[0], 0xBF);
    assert_eq!(pack_raw(&mut buf, 32).unwrap(), 3);
    assert_eq!(unpack_raw(&buf).unwrap(), (32, 3));
}

#[test]
fn every_unassigned_tag_is_reserved() {
    let reserved: Vec<u8> = (0u8..=255)
        .filter(|tag| Format::from_tag(*tag).is_none())
        .collect();
    assert_eq!(
        reserved,
        vec![0xC1, 0xC4, 0xC5, 0xC6, 0xC7, 0xC8, 0xC9, 0xD4, 0xD5, 0xD6, 0xD7, 0xD8, 0xD9]
    );
}

#[test]
fn mismatch_reports_found_tag() {
    assert_eq!(
        unpack_map(&[0xC0]).unwrap_err(),
        PackError::TypeMismatch {
            expected: minipack::ElementKind::Map,
            found: 0xC0
        }
    );
}
