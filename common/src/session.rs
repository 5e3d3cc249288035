//! Editing session: the loaded document, the displayed record and the
//! save queue behind it.
//!
//! Every front end drives the same operations:
//! open / display / search / previous / next / modify.
//! Each returns the `RecordForm` to draw, or an error to show as a notice.

use std::path::Path;

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::form::{parse_confirmed_results, RecordForm};
use crate::save_queue::{SaveOutcome, SaveQueue};
use crate::store::RecordStore;

pub struct Session {
    store: RecordStore,
    current: Option<usize>,
    saves: SaveQueue,
}

impl Session {
    pub fn new(indent: usize) -> Result<Self> {
        Self::from_store(RecordStore::new(), indent)
    }

    pub fn with_config(config: &Config) -> Result<Self> {
        Self::new(config.indent)
    }

    /// Session over an existing store, showing its first record.
    pub fn from_store(store: RecordStore, indent: usize) -> Result<Self> {
        let current = if store.is_empty() { None } else { Some(0) };
        Ok(Self {
            store,
            current,
            saves: SaveQueue::spawn(indent)?,
        })
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn path(&self) -> Option<&Path> {
        self.store.path()
    }

    /// Folder used to resolve relative image paths.
    pub fn base_dir(&self) -> Option<&Path> {
        self.store.path().and_then(Path::parent)
    }

    /// Save the current document, then load `path` in its place.
    ///
    /// Saves still queued for `path` itself are written before it is read,
    /// so reopening the open document sees its latest edits. Saves of
    /// other documents keep running in the background.
    /// On failure the current document and index stay as they were.
    pub fn open(&mut self, path: &Path) -> Result<Option<RecordForm>> {
        if !self.store.is_empty() {
            self.save_async()?;
        }
        self.saves.flush_path(path);
        self.store.load(path)?;
        info!(path = %path.display(), records = self.store.len(), "opened");
        self.current = None;
        if self.store.is_empty() {
            return Ok(None);
        }
        self.display(0).map(Some)
    }

    /// Open the configured default document if it exists.
    pub fn open_default(&mut self, config: &Config) -> Result<Option<RecordForm>> {
        match config.default_document_path() {
            Some(path) if path.exists() => self.open(&path),
            Some(path) => {
                debug!(path = %path.display(), "no default document");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    pub fn display(&mut self, index: usize) -> Result<RecordForm> {
        let total = self.store.len();
        let record = self.store.get(index).ok_or(Error::IndexOutOfRange { index, len: total })?;
        let form = RecordForm::from_record(index, total, record);
        self.current = Some(index);
        Ok(form)
    }

    pub fn current_form(&self) -> Option<RecordForm> {
        let index = self.current?;
        let record = self.store.get(index)?;
        Some(RecordForm::from_record(index, self.store.len(), record))
    }

    /// Show the first record confirmed as `term`, else the first whose raw
    /// identifier is `term`.
    pub fn search(&mut self, term: &str) -> Result<RecordForm> {
        let found = self
            .store
            .find(|r| r.confirmed_identifier.as_deref() == Some(term))
            .or_else(|| self.store.find(|r| r.identifier == term));
        match found {
            Some(index) => self.display(index),
            None => {
                debug!(term, "search found nothing");
                Err(Error::NotFound(term.to_string()))
            }
        }
    }

    pub fn show_previous(&mut self) -> Option<RecordForm> {
        let index = self.current?.checked_sub(1)?;
        self.display(index).ok()
    }

    pub fn show_next(&mut self) -> Option<RecordForm> {
        let index = self.current? + 1;
        if index >= self.store.len() {
            return None;
        }
        self.display(index).ok()
    }

    /// Write the edited values into the displayed record and queue a save.
    ///
    /// Returns `Ok(None)` when no record is displayed. A validation error
    /// leaves the record untouched.
    pub fn modify(
        &mut self,
        confirmed_identifier: &str,
        confirmed_results: &str,
    ) -> Result<Option<RecordForm>> {
        let Some(index) = self.current else {
            return Ok(None);
        };
        let results = parse_confirmed_results(confirmed_results)?;
        let Some(record) = self.store.get_mut(index) else {
            return Ok(None);
        };
        record.confirm(confirmed_identifier.to_string(), results);
        debug!(index, identifier = confirmed_identifier, "record confirmed");

        self.save_async()?;
        self.display(index).map(Some)
    }

    /// Queue a write of the whole document to its file. No-op before a
    /// file is opened.
    pub fn save_async(&self) -> Result<()> {
        match self.store.path() {
            Some(path) => self.saves.submit(path, self.store.snapshot()),
            None => Ok(()),
        }
    }

    pub fn poll_saves(&self) -> Vec<SaveOutcome> {
        self.saves.drain_outcomes()
    }

    pub fn has_pending_saves(&self) -> bool {
        !self.saves.is_idle()
    }

    /// Block until queued saves are on disk.
    pub fn flush(&self) {
        self.saves.flush();
    }
}
