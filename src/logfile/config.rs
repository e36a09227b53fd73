//! Configuration for a printing run.

use encoding_rs::{Encoding, UTF_8};

use super::types::error::{LogFileError, Result};
use super::types::models::PrintMode;

/// Settings that stay constant for a whole invocation.
#[derive(Debug, Clone, Copy)]
pub struct PrinterConfig {
    /// How each record is rendered.
    pub mode: PrintMode,
    /// Descend into matched directories.
    pub recursive: bool,
    /// Text encoding of payloads.
    pub encoding: &'static Encoding,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            mode: PrintMode::default(),
            recursive: false,
            encoding: UTF_8,
        }
    }
}

impl PrinterConfig {
    pub fn with_mode(mut self, mode: PrintMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }
}

/// Looks up an encoding by WHATWG label (`utf-8`, `latin1`, `gbk`, ...).
pub fn parse_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| LogFileError::UnknownEncoding(label.to_string()))
}
