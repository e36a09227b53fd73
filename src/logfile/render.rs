//! Formatting records as output lines.

use std::io::Write;
use encoding_rs::{Encoding, UTF_8};

use super::types::error::Result;
use super::types::models::{PrintMode, Record};

/// Turns records into text lines according to a [`PrintMode`].
#[derive(Debug, Clone, Copy)]
pub struct RecordRenderer {
    mode: PrintMode,
    encoding: &'static Encoding,
}

impl RecordRenderer {
    /// Renderer decoding payloads as UTF-8.
    pub fn new(mode: PrintMode) -> Self {
        Self::with_encoding(mode, UTF_8)
    }

    pub fn with_encoding(mode: PrintMode, encoding: &'static Encoding) -> Self {
        Self { mode, encoding }
    }

    pub fn mode(&self) -> PrintMode {
        self.mode
    }

    /// Decodes a payload as text. Byte order marks are kept as content and
    /// malformed sequences become U+FFFD.
    pub fn payload_text(&self, payload: &[u8]) -> String {
        let (text, _) = self.encoding.decode_without_bom_handling(payload);
        text.into_owned()
    }

    /// The output line for `record`, without the trailing newline.
    pub fn render_line(&self, record: &Record) -> String {
        match self.mode {
            PrintMode::OffsetsOnly => record.offset.to_string(),
            PrintMode::MessagesOnly => self.payload_text(&record.payload),
            PrintMode::OffsetAndMessage => {
                format!("{}: {}", record.offset, self.payload_text(&record.payload))
            }
        }
    }

    /// Writes one line per record, in arrival order.
    ///
    /// Stops at the first decode error and returns it; lines already written
    /// stay written. Returns the number of records rendered.
    pub fn render_all<I, W>(&self, records: I, out: &mut W) -> Result<u64>
    where
        I: IntoIterator<Item = Result<Record>>,
        W: Write + ?Sized,
    {
        let mut rendered = 0;
        for record in records {
            let record = record?;
            writeln!(out, "{}", self.render_line(&record))?;
            rendered += 1;
        }
        Ok(rendered)
    }
}
