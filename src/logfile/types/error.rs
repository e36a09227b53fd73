//! Error types for the logfile-printer crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum LogFileError {
    /// The path pattern did not match any entry.
    #[error("unable to find file '{pattern}'")]
    NotFound { pattern: String },

    /// A specific entry could not be listed or accessed during enumeration.
    #[error("unable to read '{path}': {source}")]
    UnreadableEntry {
        path: String,
        #[source]
        source: Box<LogFileError>,
    },

    /// A matched entry is neither a regular file nor a directory.
    #[error("Non-file and non-directory found at '{path}'")]
    NonFileNonDirectory { path: String },

    /// The byte stream does not follow the record framing.
    #[error("corrupt record #{index} in '{path}': {reason}")]
    CorruptRecord {
        path: String,
        /// Zero-based position of the record that failed to decode.
        index: u64,
        reason: CorruptReason,
    },

    /// An error originating from I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error reported by the object store client.
    #[error("object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    /// The glob pattern itself is malformed.
    #[error("invalid path pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// The path names a URI scheme no backend handles.
    #[error("unsupported filesystem scheme '{0}'")]
    UnsupportedScheme(String),

    /// The requested payload text encoding is not a known WHATWG label.
    #[error("unknown text encoding '{0}'")]
    UnknownEncoding(String),
}

/// Why a record failed to decode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorruptReason {
    #[error("offset field truncated after {read} of 8 bytes")]
    TruncatedOffset { read: usize },

    #[error("length prefix truncated after {read} of 4 bytes")]
    TruncatedLength { read: usize },

    #[error("payload declares {declared} bytes but only {available} remain")]
    TruncatedPayload { declared: u32, available: u64 },
}

impl LogFileError {
    /// Wraps an error raised while touching one entry during enumeration.
    pub fn unreadable(path: impl Into<String>, source: LogFileError) -> Self {
        LogFileError::UnreadableEntry {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

/// A convenience `Result` type alias using the crate's `LogFileError` type.
pub type Result<T> = std::result::Result<T, LogFileError>;
