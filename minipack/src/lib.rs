//! Self-describing binary element codec for the evdb event store.
//!
//! Every element starts with a tag byte that determines its kind and size
//! class. Integers, floats, booleans, nil, raw byte strings, arrays and maps
//! are supported; multi-byte payloads are big-endian.
//!
//! Each kind exposes the same family of functions:
//!
//! - `is_<kind>(buf)` classifies the element at the start of `buf`.
//! - `sizeof_<kind>(value)` returns the packed size for a value.
//! - `unpack_<kind>(buf)` returns the value and the number of bytes consumed.
//! - `pack_<kind>(out, value)` writes the element and returns its size.
//!
//! # Design Principles
//!
//! - **No unsafe code** - All access goes through bounds-checked slices.
//! - **Smallest encoding** - Packing always picks the smallest size class.
//! - **No recursion** - Array and map headers are decoded, members are not.
//! - **Explicit errors** - A kind mismatch is an error value, never a panic,
//!   and never mutates an output.
//!
//! # Example
//!
//! ```
//! use minipack::{ElementReader, ElementWriter};
//!
//! let mut writer = ElementWriter::new();
//! writer.write_map(1).unwrap();
//! writer.write_int(-1);
//! writer.write_raw(b"A1").unwrap();
//! let bytes = writer.finish();
//!
//! let mut reader = ElementReader::new(&bytes);
//! assert_eq!(reader.read_map().unwrap(), 1);
//! assert_eq!(reader.read_int().unwrap(), -1);
//! assert_eq!(reader.read_raw().unwrap(), b"A1");
//! ```

mod bytes;
mod container;
mod elem;
mod error;
mod int;
mod reader;
mod scalar;
pub mod stream;
mod tag;
mod writer;

pub use container::{
    is_array, is_map, is_raw, pack_array, pack_map, pack_raw, pack_raw_bytes, sizeof_array,
    sizeof_array_elem, sizeof_map, sizeof_map_elem, sizeof_raw, sizeof_raw_elem, unpack_array,
    unpack_map, unpack_raw, unpack_raw_bytes,
};
pub use elem::sizeof_elem_and_data;
pub use error::{PackError, PackResult};
pub use int::{
    is_int, is_int16, is_int32, is_int64, is_int8, is_neg_fixnum, is_pos_fixnum, is_uint,
    is_uint16, is_uint32, is_uint64, is_uint8, pack_int, pack_int16, pack_int32, pack_int64,
    pack_int8, pack_neg_fixnum, pack_pos_fixnum, pack_uint, pack_uint16, pack_uint32, pack_uint64,
    pack_uint8, sizeof_int, sizeof_int_elem, sizeof_uint, sizeof_uint_elem, unpack_int,
    unpack_int16, unpack_int32, unpack_int64, unpack_int8, unpack_neg_fixnum, unpack_pos_fixnum,
    unpack_uint, unpack_uint16, unpack_uint32, unpack_uint64, unpack_uint8,
};
pub use reader::ElementReader;
pub use scalar::{
    is_bool, is_double, is_false, is_float, is_nil, is_true, pack_bool, pack_double, pack_float,
    pack_nil, unpack_bool, unpack_double, unpack_float, unpack_nil, BOOL_SIZE, DOUBLE_SIZE,
    FLOAT_SIZE, NIL_SIZE,
};
pub use tag::{ElementKind, Format, MAX_SCALAR_SIZE};
pub use writer::ElementWriter;
