//! Hex dump of buffer regions for stream fault diagnostics.

use std::fmt::Write as _;

use tracing::debug;

const BYTES_PER_LINE: usize = 16;

/// Formats `buf` as offset-prefixed hex lines with an ASCII column.
///
/// Offsets start at `base`.
#[must_use]
pub fn hex_lines(buf: &[u8], base: usize) -> Vec<String> {
    buf.chunks(BYTES_PER_LINE)
        .enumerate()
        .map(|(i, chunk)| {
            let mut line = format!("{:08x}  ", base + i * BYTES_PER_LINE);
            for col in 0..BYTES_PER_LINE {
                match chunk.get(col) {
                    Some(byte) => {
                        let _ = write!(line, "{byte:02x} ");
                    }
                    None => line.push_str("   "),
                }
            }
            line.push('|');
            line.extend(chunk.iter().map(|&b| {
                if b.is_ascii_graphic() || b == b' ' {
                    char::from(b)
                } else {
                    '.'
                }
            }));
            line.push('|');
            line
        })
        .collect()
}

/// Emits up to `limit` bytes of `buf` starting at `pos`, at debug level.
pub fn dump(buf: &[u8], pos: usize, limit: usize) {
    let start = pos.min(buf.len());
    let end = start.saturating_add(limit).min(buf.len());
    for line in hex_lines(&buf[start..end], start) {
        debug!(target: "evdb::dump", "{line}");
    }
}
