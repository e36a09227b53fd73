#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::io::{self, Cursor, Read};

use glob::{MatchOptions, Pattern};
use logfile_printer::{write_record, FileEntry, FileKind, FileListing, FileSystem, LogFileError, Result};

/// Frames `records` into the bytes of a log file.
pub fn encode(records: &[(u64, &[u8])]) -> Vec<u8> {
    let mut buf = Vec::new();
    for (offset, payload) in records {
        write_record(&mut buf, *offset, payload).expect("write to Vec");
    }
    buf
}

/// A node of the in-memory tree.
#[derive(Debug, Clone)]
pub enum Node {
    File(Vec<u8>),
    Dir,
    /// A directory whose listing fails.
    LockedDir,
    /// Neither file nor directory.
    Special,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Glob(String),
    List(String),
    Open(String),
}

/// In-memory [`FileSystem`] that records every call and behaves like a
/// remote store with stale-able cursors: a listing cursor fails once any file
/// is opened while it is still alive, and opening a file while a cursor is
/// alive is counted as a violation.
#[derive(Default)]
pub struct RecordingFileSystem {
    nodes: BTreeMap<String, Node>,
    events: RefCell<Vec<Event>>,
    live_cursors: Cell<usize>,
    opens: Cell<usize>,
    violations: Cell<usize>,
}

impl RecordingFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, records: &[(u64, &[u8])]) -> Self {
        self.add_parents(path);
        self.nodes.insert(path.to_string(), Node::File(encode(records)));
        self
    }

    pub fn with_raw_file(mut self, path: &str, bytes: Vec<u8>) -> Self {
        self.add_parents(path);
        self.nodes.insert(path.to_string(), Node::File(bytes));
        self
    }

    pub fn with_node(mut self, path: &str, node: Node) -> Self {
        self.add_parents(path);
        self.nodes.insert(path.to_string(), node);
        self
    }

    fn add_parents(&mut self, path: &str) {
        let mut end = 0;
        while let Some(pos) = path[end + 1..].find('/') {
            end += pos + 1;
            self.nodes
                .entry(path[..end].to_string())
                .or_insert(Node::Dir);
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn violations(&self) -> usize {
        self.violations.get()
    }

    fn kind_of(node: &Node) -> FileKind {
        match node {
            Node::File(_) => FileKind::File,
            Node::Dir | Node::LockedDir => FileKind::Directory,
            Node::Special => FileKind::Other,
        }
    }

    fn node(&self, path: &str) -> Result<&Node> {
        self.nodes
            .get(path)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.to_string()).into())
    }

    fn children(&self, dir: &str) -> Result<Vec<FileEntry>> {
        if let Node::LockedDir = self.node(dir)? {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, dir.to_string()).into());
        }
        let prefix = format!("{}/", dir);
        Ok(self
            .nodes
            .iter()
            .filter(|(path, _)| path.starts_with(&prefix) && !path[prefix.len()..].contains('/'))
            .map(|(path, node)| FileEntry::new(path.clone(), Self::kind_of(node)))
            .collect())
    }

    fn walk(&self, dir: &str, out: &mut VecDeque<Result<FileEntry>>) {
        match self.children(dir) {
            Ok(children) => {
                for child in children {
                    let kind = child.kind;
                    match kind {
                        FileKind::File => out.push_back(Ok(child)),
                        FileKind::Directory => self.walk(&child.path, out),
                        FileKind::Other => {}
                    }
                }
            }
            Err(e) => out.push_back(Err(LogFileError::unreadable(dir, e))),
        }
    }

    fn cursor(&self, items: VecDeque<Result<FileEntry>>) -> FileListing<'_> {
        self.live_cursors.set(self.live_cursors.get() + 1);
        Box::new(StaleCursor {
            fs: self,
            items,
            opens_at_start: self.opens.get(),
        })
    }
}

struct StaleCursor<'a> {
    fs: &'a RecordingFileSystem,
    items: VecDeque<Result<FileEntry>>,
    opens_at_start: usize,
}

impl Iterator for StaleCursor<'_> {
    type Item = Result<FileEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.fs.opens.get() != self.opens_at_start && !self.items.is_empty() {
            self.items.clear();
            let stale = io::Error::new(io::ErrorKind::Other, "listing cursor went stale");
            return Some(Err(LogFileError::Io(stale)));
        }
        self.items.pop_front()
    }
}

impl Drop for StaleCursor<'_> {
    fn drop(&mut self) {
        self.fs.live_cursors.set(self.fs.live_cursors.get() - 1);
    }
}

impl FileSystem for RecordingFileSystem {
    fn glob(&self, pattern: &str) -> Result<FileListing<'_>> {
        self.events.borrow_mut().push(Event::Glob(pattern.to_string()));
        let compiled = Pattern::new(pattern)?;
        let options = MatchOptions {
            require_literal_separator: true,
            ..MatchOptions::new()
        };
        let matches = self
            .nodes
            .iter()
            .filter(|(path, _)| compiled.matches_with(path, options))
            .map(|(path, node)| Ok(FileEntry::new(path.clone(), Self::kind_of(node))))
            .collect();
        Ok(self.cursor(matches))
    }

    fn status(&self, path: &str) -> Result<FileEntry> {
        let node = self.node(path)?;
        Ok(FileEntry::new(path, Self::kind_of(node)))
    }

    fn list_dir(&self, path: &str) -> Result<Vec<FileEntry>> {
        self.events.borrow_mut().push(Event::List(path.to_string()));
        self.children(path)
    }

    fn list_files(&self, dir: &str) -> Result<FileListing<'_>> {
        self.events.borrow_mut().push(Event::List(dir.to_string()));
        if let Node::LockedDir = self.node(dir)? {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, dir.to_string()).into());
        }
        let mut items = VecDeque::new();
        self.walk(dir, &mut items);
        Ok(self.cursor(items))
    }

    fn open(&self, path: &str) -> Result<Box<dyn Read + '_>> {
        self.events.borrow_mut().push(Event::Open(path.to_string()));
        self.opens.set(self.opens.get() + 1);
        if self.live_cursors.get() > 0 {
            self.violations.set(self.violations.get() + 1);
        }
        match self.node(path)? {
            Node::File(bytes) => Ok(Box::new(Cursor::new(bytes.clone()))),
            _ => Err(io::Error::new(io::ErrorKind::InvalidInput, path.to_string()).into()),
        }
    }
}

/// Runs `print` against in-memory buffers and returns `(result, stdout, stderr)`.
pub fn run_printer(
    printer: &logfile_printer::LogFilePrinter<'_>,
    pattern: &str,
) -> (Result<logfile_printer::PrintSummary>, String, String) {
    let mut out = Vec::new();
    let mut diag = Vec::new();
    let result = printer.print(pattern, &mut out, &mut diag);
    (
        result,
        String::from_utf8(out).expect("utf-8 stdout"),
        String::from_utf8(diag).expect("utf-8 stderr"),
    )
}
