//! Low-level byte reading utilities

use std::io::{ErrorKind, Read};

/// Fill `buf` from `reader`, stopping early only at end-of-stream.
///
/// Unlike `read_exact`, a short read is not an error: the number of bytes
/// actually read is returned so callers can tell a clean end (0) from a
/// truncated field.
pub fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// True if `pattern` contains glob metacharacters.
pub fn has_wildcard(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}
