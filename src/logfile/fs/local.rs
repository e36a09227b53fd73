//! Local disk backend.

use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::Path;
use glob::MatchOptions;
use jwalk::{Parallelism, WalkDir};
use log::trace;

use super::{FileListing, FileSystem};
use crate::logfile::types::error::{LogFileError, Result};
use crate::logfile::types::models::{FileEntry, FileKind};

/// [`FileSystem`] over the local disk.
///
/// Glob results and recursive listings are sorted by path, and a recursive
/// listing walks one directory at a time on the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

impl FileSystem for LocalFileSystem {
    fn glob(&self, pattern: &str) -> Result<FileListing<'_>> {
        let options = MatchOptions {
            require_literal_separator: true,
            ..MatchOptions::new()
        };
        let paths = glob::glob_with(pattern, options)?;
        let listing = paths.map(move |matched| match matched {
            Ok(path) => {
                let path = path_string(&path);
                self.status(&path)
                    .map_err(|e| LogFileError::unreadable(path, e))
            }
            Err(e) => {
                let path = path_string(e.path());
                Err(LogFileError::unreadable(path, e.into_error().into()))
            }
        });
        Ok(Box::new(listing))
    }

    fn status(&self, path: &str) -> Result<FileEntry> {
        let kind = match fs::metadata(path) {
            Ok(meta) if meta.is_file() => FileKind::File,
            Ok(meta) if meta.is_dir() => FileKind::Directory,
            Ok(_) => FileKind::Other,
            // A link whose target is gone still exists as an entry.
            Err(_) if fs::symlink_metadata(path).is_ok() => FileKind::Other,
            Err(e) => return Err(e.into()),
        };
        Ok(FileEntry::new(path, kind))
    }

    fn list_dir(&self, path: &str) -> Result<Vec<FileEntry>> {
        let mut children = Vec::new();
        for entry in fs::read_dir(path)? {
            let child = path_string(&entry?.path());
            children.push(self.status(&child)?);
        }
        children.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(children)
    }

    fn list_files(&self, dir: &str) -> Result<FileListing<'_>> {
        // jwalk reports an unreadable root as an item, so probe it up front.
        if !fs::metadata(dir)?.is_dir() {
            let reason = format!("'{}' is not a directory", dir);
            return Err(io::Error::new(io::ErrorKind::InvalidInput, reason).into());
        }

        let root = dir.to_string();
        let walk = WalkDir::new(dir)
            .sort(true)
            .skip_hidden(false)
            .follow_links(false)
            .parallelism(Parallelism::Serial);

        let listing = walk.into_iter().filter_map(move |item| match item {
            Ok(entry) => {
                let file_type = entry.file_type();
                let path = path_string(&entry.path());
                if file_type.is_file() {
                    trace!("Listed file '{}'", path);
                    Some(Ok(FileEntry::file(path)))
                } else if file_type.is_symlink() {
                    match self.status(&path) {
                        Ok(target) if target.is_file() => Some(Ok(FileEntry::file(path))),
                        Ok(_) => None,
                        Err(e) => Some(Err(LogFileError::unreadable(path, e))),
                    }
                } else {
                    None
                }
            }
            Err(e) => {
                let path = e
                    .path()
                    .map(path_string)
                    .unwrap_or_else(|| root.clone());
                let source = io::Error::other(e.to_string());
                Some(Err(LogFileError::unreadable(path, source.into())))
            }
        });

        Ok(Box::new(listing))
    }

    fn open(&self, path: &str) -> Result<Box<dyn Read + '_>> {
        let file = File::open(path)?;
        Ok(Box::new(BufReader::new(file)))
    }
}
