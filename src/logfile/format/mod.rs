//! On-disk format of a log file.
//!
//! ```text
//! File Structure:
//! ┌─────────────────┐
//! │  Record 0       │ ← record::read_record()
//! ├─────────────────┤
//! │  Record 1       │
//! ├─────────────────┤
//! │  ...            │
//! └─────────────────┘
//! ```
//!
//! There is no file header, trailer or index: a zero-byte file is a valid
//! log with no records.

pub mod record;
