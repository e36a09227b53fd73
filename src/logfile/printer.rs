//! Ties enumeration, decoding and rendering together for one invocation.

use std::io::Write;
use log::{debug, info};

use super::config::PrinterConfig;
use super::enumerate::PathEnumerator;
use super::fs::FileSystem;
use super::iter::RecordIterator;
use super::render::RecordRenderer;
use super::types::error::Result;
use super::types::models::FileEntry;

/// Totals for a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrintSummary {
    pub files: usize,
    pub records: u64,
    pub warnings: usize,
}

/// Prints every record of every file matched by a pattern.
///
/// Record lines go to `out`; progress lines (`reading file ...`) and
/// enumeration warnings go to `diag`, so the two can be separated by stream.
pub struct LogFilePrinter<'a> {
    fs: &'a dyn FileSystem,
    config: PrinterConfig,
}

impl<'a> LogFilePrinter<'a> {
    pub fn new(fs: &'a dyn FileSystem, config: PrinterConfig) -> Self {
        Self { fs, config }
    }

    /// Runs the printer over `pattern`.
    ///
    /// # Errors
    /// - `NotFound` if nothing matches, or the resolution error if every
    ///   match failed to resolve; nothing is written to `out`.
    /// - `CorruptRecord` on the first malformed record; the run stops there.
    /// - I/O errors from opening files or writing output.
    pub fn print<W, D>(&self, pattern: &str, out: &mut W, diag: &mut D) -> Result<PrintSummary>
    where
        W: Write + ?Sized,
        D: Write + ?Sized,
    {
        let list = PathEnumerator::new(self.fs, self.config.recursive).enumerate(pattern)?;
        for warning in &list.warnings {
            writeln!(diag, "{}", warning)?;
        }

        let renderer = RecordRenderer::with_encoding(self.config.mode, self.config.encoding);
        let mut summary = PrintSummary {
            warnings: list.warnings.len(),
            ..PrintSummary::default()
        };
        for entry in &list.files {
            summary.records += self.print_file(entry, &renderer, out, diag)?;
            summary.files += 1;
        }
        out.flush()?;

        info!(
            "Printed {} records from {} files",
            summary.records, summary.files
        );
        Ok(summary)
    }

    fn print_file<W, D>(
        &self,
        entry: &FileEntry,
        renderer: &RecordRenderer,
        out: &mut W,
        diag: &mut D,
    ) -> Result<u64>
    where
        W: Write + ?Sized,
        D: Write + ?Sized,
    {
        info!("Opening log file: {}", entry.path);
        let reader = self.fs.open(&entry.path)?;
        let records = RecordIterator::new(reader, entry.path.as_str());
        writeln!(diag, "reading file {}", records.path())?;
        debug!("Rendering '{}' as {:?}", records.path(), renderer.mode());
        renderer.render_all(records, out)
    }
}
