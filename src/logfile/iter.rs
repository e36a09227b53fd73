//! Lazy, forward-only iteration over the records of one log file.
//!
//! # Example
//! ```no_run
//! # use logfile_printer::decode;
//! let file = std::fs::File::open("events.log").unwrap();
//! for result in decode(file, "events.log") {
//!     let record = result.unwrap();
//!     println!("{}: {} bytes", record.offset, record.payload.len());
//! }
//! ```

use std::io::Read;
use log::{debug, warn};

use super::format::record::{self, FrameError};
use super::types::error::{LogFileError, Result};
use super::types::models::Record;

/// Decodes `reader` as a stream of records.
///
/// `path` only labels errors and log lines.
pub fn decode<R: Read>(reader: R, path: impl Into<String>) -> RecordIterator<R> {
    RecordIterator::new(reader, path)
}

/// Iterator over the records of a single log file.
///
/// Yields `Result<Record>`. The stream is owned by the iterator and dropped
/// as soon as the sequence ends, whether at a clean end-of-stream or at the
/// first decode error. After that `next` always returns `None`; the iterator
/// cannot be restarted.
pub struct RecordIterator<R: Read> {
    reader: Option<R>,
    path: String,
    index: u64,
    last_offset: Option<u64>,
}

impl<R: Read> RecordIterator<R> {
    pub fn new(reader: R, path: impl Into<String>) -> Self {
        Self {
            reader: Some(reader),
            path: path.into(),
            index: 0,
            last_offset: None,
        }
    }

    /// The path this iterator was opened for.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Number of records successfully decoded so far.
    pub fn records_read(&self) -> u64 {
        self.index
    }

    /// True once the underlying stream has been released.
    pub fn is_closed(&self) -> bool {
        self.reader.is_none()
    }

    fn close(&mut self) {
        if self.reader.take().is_some() {
            debug!("Closed '{}' after {} records", self.path, self.index);
        }
    }
}

impl<R: Read> Iterator for RecordIterator<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;

        match record::read_record(reader) {
            Ok(Some(record)) => {
                if let Some(last) = self.last_offset {
                    if record.offset < last {
                        warn!(
                            "Offset went backwards in '{}' at record #{}: {} after {}",
                            self.path, self.index, record.offset, last
                        );
                    }
                }
                self.last_offset = Some(record.offset);
                self.index += 1;
                Some(Ok(record))
            }
            Ok(None) => {
                self.close();
                None
            }
            Err(FrameError::Corrupt(reason)) => {
                let err = LogFileError::CorruptRecord {
                    path: self.path.clone(),
                    index: self.index,
                    reason,
                };
                self.close();
                Some(Err(err))
            }
            Err(FrameError::Io(e)) => {
                self.close();
                Some(Err(LogFileError::Io(e)))
            }
        }
    }
}

impl<R: Read> std::iter::FusedIterator for RecordIterator<R> {}
