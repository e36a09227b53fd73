//! # logfile-printer
//!
//! A diagnostic reader for append-only binary log files. Each file is a
//! sequence of `(offset, payload)` records; files are found by path pattern
//! on local disk or in an object store, decoded front to back, and printed
//! as text.
pub mod logfile;

// Re-export the main types for convenience
pub use logfile::{
    config::{parse_encoding, PrinterConfig},
    enumerate::{enumerate, PathEnumerator},
    format::record::{read_record, write_record},
    fs::{for_path, FileListing, FileSystem, LocalFileSystem, ObjectStoreFileSystem},
    iter::{decode, RecordIterator},
    printer::{LogFilePrinter, PrintSummary},
    render::RecordRenderer,
    types::models::{EnumerationWarning, FileEntry, FileKind, FileList, PrintMode, Record},
    CorruptReason, LogFileError, Result,
};
