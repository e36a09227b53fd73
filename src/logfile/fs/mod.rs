//! Filesystem port and its backends.
//!
//! The enumerator and printer only talk to the [`FileSystem`] trait. Which
//! implementation backs it is decided once per invocation from the scheme of
//! the path pattern, see [`for_path`].
//!
//! | Scheme                      | Backend                    |
//! |-----------------------------|----------------------------|
//! | none, `file://`             | [`LocalFileSystem`]        |
//! | `s3://`, `s3a://`, `s3n://` | [`ObjectStoreFileSystem`]  |

mod local;
mod object;

use std::io::Read;
use std::sync::Arc;
use log::debug;
use object_store::aws::AmazonS3Builder;

use super::types::error::{LogFileError, Result};
use super::types::models::FileEntry;

pub use local::LocalFileSystem;
pub use object::ObjectStoreFileSystem;

/// A cursor over filesystem entries.
///
/// Each item is one entry, or the error met while reading that entry. A
/// cursor may be lazy and may go stale once other I/O happens against the
/// same filesystem, so callers drain it before opening any file.
pub type FileListing<'a> = Box<dyn Iterator<Item = Result<FileEntry>> + 'a>;

/// Capabilities the printer needs from a filesystem.
pub trait FileSystem {
    /// Resolves a path pattern to the entries it matches, in resolution order.
    ///
    /// A pattern without wildcards matches at most the entry it names.
    fn glob(&self, pattern: &str) -> Result<FileListing<'_>>;

    /// Classifies a single entry.
    fn status(&self, path: &str) -> Result<FileEntry>;

    /// Immediate children of a directory, sorted by path.
    fn list_dir(&self, path: &str) -> Result<Vec<FileEntry>>;

    /// Every file transitively beneath `dir`, in enumeration order.
    ///
    /// The default walks [`list_dir`](Self::list_dir) depth-first in
    /// pre-order. A subdirectory that cannot be listed is reported as an
    /// error item and the walk continues with its siblings.
    fn list_files(&self, dir: &str) -> Result<FileListing<'_>> {
        let mut found = Vec::new();
        let mut pending = vec![self.list_dir(dir)?.into_iter()];

        while let Some(children) = pending.last_mut() {
            let Some(child) = children.next() else {
                pending.pop();
                continue;
            };
            if child.is_dir() {
                match self.list_dir(&child.path) {
                    Ok(grandchildren) => pending.push(grandchildren.into_iter()),
                    Err(e) => found.push(Err(LogFileError::unreadable(child.path, e))),
                }
            } else if child.is_file() {
                found.push(Ok(child));
            }
        }

        Ok(Box::new(found.into_iter()))
    }

    /// Opens a file for sequential reading.
    fn open(&self, path: &str) -> Result<Box<dyn Read + '_>>;
}

/// Picks the backend for `pattern` by its scheme.
///
/// Returns the backend and the pattern normalized for it: `s3a://` and
/// `s3n://` become `s3://`, a `file://` prefix is stripped.
pub fn for_path(pattern: &str) -> Result<(Box<dyn FileSystem>, String)> {
    let Some((scheme, rest)) = pattern.split_once("://") else {
        return Ok((Box::new(LocalFileSystem::new()), pattern.to_string()));
    };

    match scheme {
        "file" => {
            debug!("Using local filesystem for '{}'", pattern);
            Ok((Box::new(LocalFileSystem::new()), rest.to_string()))
        }
        "s3" | "s3a" | "s3n" => {
            let bucket = rest.split('/').next().unwrap_or_default();
            if bucket.is_empty() {
                return Err(LogFileError::NotFound {
                    pattern: pattern.to_string(),
                });
            }
            debug!("Using S3 bucket '{}' for '{}'", bucket, pattern);
            let store = AmazonS3Builder::from_env()
                .with_bucket_name(bucket)
                .build()?;
            let base_url = format!("s3://{}", bucket);
            let fs = ObjectStoreFileSystem::new(Arc::new(store), base_url)?;
            Ok((Box::new(fs), format!("s3://{}", rest)))
        }
        other => Err(LogFileError::UnsupportedScheme(other.to_string())),
    }
}
