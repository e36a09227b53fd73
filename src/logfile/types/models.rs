//! Core data structures shared by the enumerator, decoder and renderer.

use std::fmt;

use super::error::LogFileError;

/// A single `(offset, payload)` unit decoded from a log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Position/sequence key of the record within its file.
    pub offset: u64,
    /// Opaque record bytes, exactly as long as the encoded length prefix.
    pub payload: Vec<u8>,
}

impl Record {
    pub fn new(offset: u64, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            offset,
            payload: payload.into(),
        }
    }
}

/// Classification of a filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    File,
    Directory,
    /// Anything else: dangling links, sockets, devices.
    Other,
}

/// A resolved filesystem object.
///
/// `path` is backend-qualified: a local path, or `scheme://bucket/key` for
/// object stores. It is accepted as-is by every [`FileSystem`](crate::FileSystem)
/// method of the backend that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: String,
    pub kind: FileKind,
}

impl FileEntry {
    pub fn new(path: impl Into<String>, kind: FileKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn file(path: impl Into<String>) -> Self {
        Self::new(path, FileKind::File)
    }

    pub fn directory(path: impl Into<String>) -> Self {
        Self::new(path, FileKind::Directory)
    }

    pub fn is_file(&self) -> bool {
        self.kind == FileKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Directory
    }
}

/// A non-fatal problem met while building a [`FileList`].
#[derive(Debug)]
pub enum EnumerationWarning {
    /// A directory matched but recursion is disabled; its contents were not visited.
    DirectorySkipped { path: String },
    /// An entry was unreadable or neither file nor directory.
    Skipped(LogFileError),
}

impl fmt::Display for EnumerationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumerationWarning::DirectorySkipped { path } => {
                write!(f, "set --recursive to read directory '{}'", path)
            }
            EnumerationWarning::Skipped(err) => write!(f, "{}", err),
        }
    }
}

/// Ordered list of files to decode, fully materialized before decoding starts.
#[derive(Debug, Default)]
pub struct FileList {
    pub files: Vec<FileEntry>,
    pub warnings: Vec<EnumerationWarning>,
}

impl FileList {
    /// Paths of the files, in decode order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|entry| entry.path.as_str())
    }
}

/// How each record is turned into an output line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PrintMode {
    /// Decimal offset alone.
    OffsetsOnly,
    /// Payload text alone.
    MessagesOnly,
    /// `"<offset>: <payload text>"`.
    #[default]
    OffsetAndMessage,
}

impl PrintMode {
    /// Maps the two exclusive CLI flags to a mode. `offsets_only` wins if both are set.
    pub fn from_flags(offsets_only: bool, messages_only: bool) -> Self {
        if offsets_only {
            PrintMode::OffsetsOnly
        } else if messages_only {
            PrintMode::MessagesOnly
        } else {
            PrintMode::OffsetAndMessage
        }
    }
}
