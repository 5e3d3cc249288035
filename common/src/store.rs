//! Record store: one document, read and written as a whole

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::Record;

pub const DEFAULT_INDENT: usize = 4;

/// Ordered records of one file plus the path they came from.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
    path: Option<PathBuf>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<Record>, path: Option<PathBuf>) -> Self {
        Self { records, path }
    }

    /// Replace the contents with the document at `path`.
    ///
    /// The current contents are kept when reading or parsing fails.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let records = read_document(path)?;
        debug!(path = %path.display(), records = records.len(), "document loaded");
        self.records = records;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Write the whole document to `path`.
    pub fn save(&self, path: &Path, indent: usize) -> Result<()> {
        write_document(path, &self.records, indent)
    }

    /// First index whose record satisfies `predicate`.
    pub fn find<P>(&self, mut predicate: P) -> Option<usize>
    where
        P: FnMut(&Record) -> bool,
    {
        self.records.iter().position(|r| predicate(r))
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Record> {
        self.records.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Snapshot of the records for a background save.
    pub fn snapshot(&self) -> Vec<Record> {
        self.records.clone()
    }
}

pub fn read_document(path: &Path) -> Result<Vec<Record>> {
    let content = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize `records` with `indent` spaces.
pub fn to_pretty_json(records: &[Record], indent: usize) -> Result<Vec<u8>> {
    let indent = " ".repeat(indent);
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut ser)?;
    Ok(buf)
}

/// Replace the file at `path` with the serialized document.
///
/// Written to a sibling temp file first and renamed over the target.
pub fn write_document(path: &Path, records: &[Record], indent: usize) -> Result<()> {
    let content = to_pretty_json(records, indent)?;
    let wrap = |source: std::io::Error| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(wrap)?;
    tmp.write_all(&content).map_err(wrap)?;
    tmp.as_file().sync_all().map_err(wrap)?;
    tmp.persist(path).map_err(|e| wrap(e.error))?;
    debug!(path = %path.display(), records = records.len(), "document written");
    Ok(())
}
