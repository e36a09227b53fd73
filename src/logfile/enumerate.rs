//! Turns a path pattern into the ordered list of files to decode.
//!
//! Listings from remote filesystems can be backed by paginated cursors that
//! go stale once other I/O hits the same connection. Every cursor is
//! therefore drained into memory before the next filesystem call, and the
//! whole [`FileList`] is built before any file is opened.

use log::{debug, info, warn};

use super::fs::FileSystem;
use super::types::error::{LogFileError, Result};
use super::types::models::{EnumerationWarning, FileEntry, FileKind, FileList};

/// Resolves path patterns against one [`FileSystem`].
pub struct PathEnumerator<'a> {
    fs: &'a dyn FileSystem,
    recursive: bool,
}

impl<'a> PathEnumerator<'a> {
    pub fn new(fs: &'a dyn FileSystem, recursive: bool) -> Self {
        Self { fs, recursive }
    }

    /// Builds the file list for `pattern`.
    ///
    /// # Errors
    /// - `NotFound` if the pattern matches nothing.
    /// - The first resolution error if the pattern resolved to errors only.
    /// - Any error raised while starting pattern resolution itself.
    ///
    /// Once at least one entry resolves, problems with the others never fail
    /// the call; they end up in [`FileList::warnings`].
    pub fn enumerate(&self, pattern: &str) -> Result<FileList> {
        let matches: Vec<Result<FileEntry>> = self.fs.glob(pattern)?.collect();
        if !matches.iter().any(|matched| matched.is_ok()) {
            return Err(matches
                .into_iter()
                .find_map(|matched| matched.err())
                .unwrap_or_else(|| LogFileError::NotFound {
                    pattern: pattern.to_string(),
                }));
        }
        debug!("Pattern '{}' matched {} entries", pattern, matches.len());

        let mut list = FileList::default();
        for matched in matches {
            let entry = match matched {
                Ok(entry) => entry,
                Err(e) => {
                    skip(&mut list, e);
                    continue;
                }
            };

            let kind = entry.kind;
            match kind {
                FileKind::File => list.files.push(entry),
                FileKind::Directory if !self.recursive => {
                    warn!("Skipping directory '{}' (not recursive)", entry.path);
                    list.warnings.push(EnumerationWarning::DirectorySkipped { path: entry.path });
                }
                FileKind::Directory => self.expand_directory(&entry.path, &mut list),
                FileKind::Other => {
                    skip(&mut list, LogFileError::NonFileNonDirectory { path: entry.path });
                }
            }
        }

        info!(
            "Resolved '{}' to {} files ({} warnings)",
            pattern,
            list.files.len(),
            list.warnings.len()
        );
        Ok(list)
    }

    fn expand_directory(&self, dir: &str, list: &mut FileList) {
        let listing = match self.fs.list_files(dir) {
            Ok(listing) => listing,
            Err(e) => {
                skip(list, LogFileError::unreadable(dir, e));
                return;
            }
        };

        // Drain the cursor completely before anything else touches the filesystem.
        let drained: Vec<Result<FileEntry>> = listing.collect();
        debug!("Directory '{}' listed {} entries", dir, drained.len());

        for item in drained {
            match item {
                Ok(entry) if entry.is_file() => list.files.push(entry),
                Ok(entry) => debug!("Ignoring non-file '{}' under '{}'", entry.path, dir),
                Err(e) => skip(list, e),
            }
        }
    }
}

fn skip(list: &mut FileList, err: LogFileError) {
    warn!("{}", err);
    list.warnings.push(EnumerationWarning::Skipped(err));
}

/// Shorthand for `PathEnumerator::new(fs, recursive).enumerate(pattern)`.
pub fn enumerate(fs: &dyn FileSystem, pattern: &str, recursive: bool) -> Result<FileList> {
    PathEnumerator::new(fs, recursive).enumerate(pattern)
}
