//! # Record Framing
//!
//! A log file is a bare concatenation of records, with no file header and
//! no padding between records:
//!
//! ```text
//! [8 bytes] offset          (big-endian u64)
//! [4 bytes] payload length  (big-endian u32)
//! [N bytes] payload         (N = payload length)
//! ```
//!
//! [`read_record`] decodes exactly one record and [`write_record`] is its
//! inverse, used to build fixture files.

use std::io::{self, Read, Write};
use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use log::trace;

use crate::logfile::types::error::CorruptReason;
use crate::logfile::types::models::Record;
use crate::logfile::utils;

/// Width of the offset field.
pub const OFFSET_WIDTH: usize = 8;

/// Width of the payload length prefix.
pub const LENGTH_WIDTH: usize = 4;

/// Payload bytes are pulled from the stream in chunks of at most this size,
/// so a corrupt length prefix never triggers a huge up-front allocation.
const READ_CHUNK: usize = 64 * 1024;

/// Failure to decode a single record.
#[derive(Debug)]
pub enum FrameError {
    /// The bytes do not follow the framing.
    Corrupt(CorruptReason),
    /// The underlying stream failed.
    Io(io::Error),
}

impl From<io::Error> for FrameError {
    fn from(e: io::Error) -> Self {
        FrameError::Io(e)
    }
}

/// Reads the next record from `reader`.
///
/// Returns `Ok(None)` when the stream ends cleanly on a record boundary.
pub fn read_record<R: Read>(reader: &mut R) -> Result<Option<Record>, FrameError> {
    let mut offset_buf = [0u8; OFFSET_WIDTH];
    let read = utils::read_full(reader, &mut offset_buf)?;
    if read == 0 {
        return Ok(None);
    }
    if read < OFFSET_WIDTH {
        return Err(FrameError::Corrupt(CorruptReason::TruncatedOffset { read }));
    }
    let offset = BigEndian::read_u64(&offset_buf);

    let mut length_buf = [0u8; LENGTH_WIDTH];
    let read = utils::read_full(reader, &mut length_buf)?;
    if read < LENGTH_WIDTH {
        return Err(FrameError::Corrupt(CorruptReason::TruncatedLength { read }));
    }
    let declared = BigEndian::read_u32(&length_buf);
    trace!("Record header: offset={}, payload_length={}", offset, declared);

    let payload = read_payload(reader, declared)?;
    Ok(Some(Record { offset, payload }))
}

fn read_payload<R: Read>(reader: &mut R, declared: u32) -> Result<Vec<u8>, FrameError> {
    let declared_len = declared as usize;
    let mut payload = Vec::with_capacity(declared_len.min(READ_CHUNK));
    let mut chunk = [0u8; READ_CHUNK];

    while payload.len() < declared_len {
        let want = (declared_len - payload.len()).min(READ_CHUNK);
        let got = utils::read_full(reader, &mut chunk[..want])?;
        payload.extend_from_slice(&chunk[..got]);
        if got < want {
            return Err(FrameError::Corrupt(CorruptReason::TruncatedPayload {
                declared,
                available: payload.len() as u64,
            }));
        }
    }

    payload.shrink_to_fit();
    Ok(payload)
}

/// Appends one framed record to `writer`.
///
/// Fails with `InvalidInput` if the payload does not fit the 32-bit length prefix.
pub fn write_record<W: Write>(writer: &mut W, offset: u64, payload: &[u8]) -> io::Result<()> {
    let len = u32::try_from(payload.len()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("payload of {} bytes exceeds the length prefix", payload.len()),
        )
    })?;
    writer.write_u64::<BigEndian>(offset)?;
    writer.write_u32::<BigEndian>(len)?;
    writer.write_all(payload)
}
