//! Object store backend (S3 and friends).
//!
//! Object stores have no directories, only `/`-delimited keys. A directory
//! here is any key prefix that has at least one object beneath it. All
//! calls block on a private current-thread runtime, so the backend is as
//! sequential as the local one.

use std::collections::BTreeMap;
use std::io::{self, Read};
use std::sync::Arc;
use bytes::{Buf, Bytes};
use futures::stream::BoxStream;
use futures::StreamExt;
use glob::{MatchOptions, Pattern};
use log::{debug, trace};
use object_store::path::Path as ObjectPath;
use object_store::{ObjectMeta, ObjectStore};
use tokio::runtime::{Builder, Runtime};

use super::{FileListing, FileSystem};
use crate::logfile::types::error::{LogFileError, Result};
use crate::logfile::types::models::{FileEntry, FileKind};
use crate::logfile::utils;

/// [`FileSystem`] over an [`ObjectStore`].
///
/// Paths are `"{base_url}/{key}"`, for example `s3://bucket/topic/part-0`.
pub struct ObjectStoreFileSystem {
    store: Arc<dyn ObjectStore>,
    base_url: String,
    runtime: Runtime,
}

impl ObjectStoreFileSystem {
    /// Wraps `store`, whose keys are addressed below `base_url`.
    pub fn new(store: Arc<dyn ObjectStore>, base_url: impl Into<String>) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            store,
            base_url,
            runtime,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Strips the base URL, leaving the object key without surrounding slashes.
    fn key_of<'p>(&self, path: &'p str) -> Result<&'p str> {
        match path.strip_prefix(self.base_url.as_str()) {
            Some(key) if key.is_empty() || key.starts_with('/') => Ok(key.trim_matches('/')),
            _ => {
                let reason = format!("'{}' is not below '{}'", path, self.base_url);
                Err(LogFileError::Io(io::Error::new(io::ErrorKind::InvalidInput, reason)))
            }
        }
    }

    /// Object location for a key taken from a path.
    ///
    /// Keys handed out by listings are already percent-encoded, so they are
    /// parsed as-is. Only keys that are not valid encoded paths get encoded.
    fn location_of(key: &str) -> ObjectPath {
        ObjectPath::parse(key).unwrap_or_else(|_| ObjectPath::from(key))
    }

    fn url_of(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }

    /// Lists every object under `key`, draining the store's paginated stream.
    fn list_objects(&self, key: &str) -> Vec<object_store::Result<ObjectMeta>> {
        let prefix = (!key.is_empty()).then(|| Self::location_of(key));
        self.runtime
            .block_on(self.store.list(prefix.as_ref()).collect::<Vec<_>>())
    }

    fn match_pattern(&self, key_pattern: &str) -> Result<Vec<Result<FileEntry>>> {
        let segments: Vec<&str> = key_pattern.split('/').filter(|s| !s.is_empty()).collect();
        let literal: Vec<&str> = segments
            .iter()
            .take_while(|segment| !utils::has_wildcard(segment))
            .copied()
            .collect();
        let depth = segments.len();
        let pattern = Pattern::new(&segments.join("/"))?;
        let options = MatchOptions {
            require_literal_separator: true,
            ..MatchOptions::new()
        };

        let prefix = literal.join("/");
        let mut matched: BTreeMap<String, FileKind> = BTreeMap::new();
        let mut results = Vec::new();
        for listed in self.list_objects(&prefix) {
            let meta = match listed {
                Ok(meta) => meta,
                Err(e) => {
                    results.push(Err(LogFileError::unreadable(self.url_of(&prefix), e.into())));
                    continue;
                }
            };
            let parts: Vec<&str> = meta.location.as_ref().split('/').collect();
            if parts.len() < depth {
                continue;
            }
            let candidate = parts[..depth].join("/");
            if pattern.matches_with(&candidate, options) {
                let kind = if parts.len() == depth {
                    FileKind::File
                } else {
                    FileKind::Directory
                };
                trace!("Pattern '{}' matched '{}' ({:?})", key_pattern, candidate, kind);
                matched.entry(candidate).or_insert(kind);
            }
        }

        results.extend(
            matched
                .into_iter()
                .map(|(key, kind)| Ok(FileEntry::new(self.url_of(&key), kind))),
        );
        Ok(results)
    }
}

impl FileSystem for ObjectStoreFileSystem {
    fn glob(&self, pattern: &str) -> Result<FileListing<'_>> {
        let key_pattern = self.key_of(pattern)?;
        if utils::has_wildcard(key_pattern) {
            let matches = self.match_pattern(key_pattern)?;
            return Ok(Box::new(matches.into_iter()));
        }

        match self.status(pattern) {
            Ok(entry) => Ok(Box::new(std::iter::once(Ok(entry)))),
            Err(LogFileError::NotFound { .. }) => Ok(Box::new(std::iter::empty())),
            Err(e) => Err(e),
        }
    }

    fn status(&self, path: &str) -> Result<FileEntry> {
        let key = self.key_of(path)?;
        if key.is_empty() {
            return Ok(FileEntry::directory(self.base_url.clone()));
        }

        let location = Self::location_of(key);
        match self.runtime.block_on(self.store.head(&location)) {
            Ok(_) => return Ok(FileEntry::file(self.url_of(key))),
            Err(object_store::Error::NotFound { .. }) => {}
            Err(e) => return Err(e.into()),
        }

        let listing = self
            .runtime
            .block_on(self.store.list_with_delimiter(Some(&location)))?;
        if listing.objects.is_empty() && listing.common_prefixes.is_empty() {
            return Err(LogFileError::NotFound {
                pattern: path.to_string(),
            });
        }
        Ok(FileEntry::directory(self.url_of(key)))
    }

    fn list_dir(&self, path: &str) -> Result<Vec<FileEntry>> {
        let key = self.key_of(path)?;
        let prefix = (!key.is_empty()).then(|| Self::location_of(key));
        let listing = self
            .runtime
            .block_on(self.store.list_with_delimiter(prefix.as_ref()))?;

        let mut children: Vec<FileEntry> = listing
            .common_prefixes
            .iter()
            .map(|dir| FileEntry::directory(self.url_of(dir.as_ref())))
            .chain(
                listing
                    .objects
                    .iter()
                    .map(|meta| FileEntry::file(self.url_of(meta.location.as_ref()))),
            )
            .collect();
        children.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(children)
    }

    fn list_files(&self, dir: &str) -> Result<FileListing<'_>> {
        let key = self.key_of(dir)?;
        let listed = self.list_objects(key);
        debug!("Listed {} objects under '{}'", listed.len(), dir);

        let mut files = Vec::with_capacity(listed.len());
        let mut errors: Vec<Result<FileEntry>> = Vec::new();
        for item in listed {
            match item {
                Ok(meta) => files.push(FileEntry::file(self.url_of(meta.location.as_ref()))),
                Err(e) => errors.push(Err(LogFileError::unreadable(dir, e.into()))),
            }
        }
        files.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(Box::new(files.into_iter().map(Ok).chain(errors)))
    }

    fn open(&self, path: &str) -> Result<Box<dyn Read + '_>> {
        let location = Self::location_of(self.key_of(path)?);
        let object = self.runtime.block_on(self.store.get(&location))?;
        Ok(Box::new(ObjectReader {
            runtime: &self.runtime,
            stream: object.into_stream(),
            chunk: Bytes::new(),
        }))
    }
}

/// Blocking [`Read`] over an object body, pulled one chunk at a time.
struct ObjectReader<'a> {
    runtime: &'a Runtime,
    stream: BoxStream<'static, object_store::Result<Bytes>>,
    chunk: Bytes,
}

impl Read for ObjectReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.chunk.is_empty() {
            match self.runtime.block_on(self.stream.next()) {
                Some(Ok(chunk)) => self.chunk = chunk,
                Some(Err(e)) => return Err(io::Error::other(e)),
                None => return Ok(0),
            }
        }
        let n = buf.len().min(self.chunk.len());
        buf[..n].copy_from_slice(&self.chunk[..n]);
        self.chunk.advance(n);
        Ok(n)
    }
}
