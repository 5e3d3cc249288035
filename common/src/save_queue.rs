//! Single-writer save queue
//!
//! One worker thread writes documents in request order, one at a time.
//! Each target path has at most one waiting request: a newer request for
//! the same path replaces the one still waiting. Requests carry their own
//! snapshot of the records, so switching files never writes stale data.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use tracing::{debug, error, info};

use crate::error::{Error, Result};
use crate::store::write_document;
use crate::types::Record;

struct SaveRequest {
    path: PathBuf,
    records: Vec<Record>,
}

/// Result of one finished write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub path: PathBuf,
    pub records: usize,
    pub result: std::result::Result<(), String>,
}

impl SaveOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Default)]
struct Slots {
    waiting: VecDeque<SaveRequest>,
    /// target of the write in flight
    writing: Option<PathBuf>,
    closed: bool,
}

impl Slots {
    /// Queue `request`, replacing a waiting request for the same path in place.
    fn push(&mut self, request: SaveRequest) {
        if let Some(waiting) = self.waiting.iter_mut().find(|r| r.path == request.path) {
            debug!(path = %request.path.display(), "superseding queued save");
            *waiting = request;
        } else {
            self.waiting.push_back(request);
        }
    }

    fn is_idle(&self) -> bool {
        self.waiting.is_empty() && self.writing.is_none()
    }

    /// True while a request for `path` is waiting or being written.
    fn is_busy_with(&self, path: &Path) -> bool {
        self.writing.as_deref() == Some(path) || self.waiting.iter().any(|r| r.path == path)
    }
}

struct Shared {
    slots: Mutex<Slots>,
    changed: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait<'a>(&self, guard: MutexGuard<'a, Slots>) -> MutexGuard<'a, Slots> {
        self.changed.wait(guard).unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct SaveQueue {
    shared: Arc<Shared>,
    outcomes: Receiver<SaveOutcome>,
    worker: Option<JoinHandle<()>>,
}

impl SaveQueue {
    /// Start the worker thread.
    pub fn spawn(indent: usize) -> Result<Self> {
        let shared = Arc::new(Shared {
            slots: Mutex::new(Slots::default()),
            changed: Condvar::new(),
        });
        let (tx, rx) = mpsc::channel();
        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name("record-save".to_string())
            .spawn(move || run_worker(&worker_shared, &tx, indent))?;

        Ok(Self {
            shared,
            outcomes: rx,
            worker: Some(worker),
        })
    }

    /// Queue a write of `records` to `path` and return immediately.
    pub fn submit(&self, path: &Path, records: Vec<Record>) -> Result<()> {
        let mut slots = self.shared.lock();
        if slots.closed {
            return Err(Error::SaveQueueClosed);
        }
        slots.push(SaveRequest {
            path: path.to_path_buf(),
            records,
        });
        self.shared.changed.notify_all();
        Ok(())
    }

    /// Block until every queued write has finished.
    pub fn flush(&self) {
        let mut slots = self.shared.lock();
        while !slots.is_idle() {
            slots = self.shared.wait(slots);
        }
    }

    /// Block until nothing is queued or being written for `path`.
    /// Writes to other paths may still be pending on return.
    pub fn flush_path(&self, path: &Path) {
        let mut slots = self.shared.lock();
        while slots.is_busy_with(path) {
            slots = self.shared.wait(slots);
        }
    }

    pub fn is_idle(&self) -> bool {
        self.shared.lock().is_idle()
    }

    /// Outcomes of writes finished since the last call.
    pub fn drain_outcomes(&self) -> Vec<SaveOutcome> {
        self.outcomes.try_iter().collect()
    }
}

impl Drop for SaveQueue {
    fn drop(&mut self) {
        {
            let mut slots = self.shared.lock();
            slots.closed = true;
            self.shared.changed.notify_all();
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("save worker panicked");
            }
        }
    }
}

fn run_worker(shared: &Shared, outcomes: &Sender<SaveOutcome>, indent: usize) {
    loop {
        let request = {
            let mut slots = shared.lock();
            while slots.waiting.is_empty() && !slots.closed {
                slots = shared.wait(slots);
            }
            // closed with nothing left to write
            let Some(request) = slots.waiting.pop_front() else {
                break;
            };
            slots.writing = Some(request.path.clone());
            request
        };

        let result = write_document(&request.path, &request.records, indent);
        match &result {
            Ok(()) => info!(
                path = %request.path.display(),
                records = request.records.len(),
                "saved"
            ),
            Err(err) => error!(path = %request.path.display(), error = %err, "save failed"),
        }
        // The receiver may be gone while the queue drains on drop.
        let _ = outcomes.send(SaveOutcome {
            path: request.path,
            records: request.records.len(),
            result: result.map_err(|e| e.to_string()),
        });

        let mut slots = shared.lock();
        slots.writing = None;
        shared.changed.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{read_document, DEFAULT_INDENT};
    use tempfile::tempdir;

    #[test]
    fn test_submit_and_flush() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("out.json");
        let queue = SaveQueue::spawn(DEFAULT_INDENT).unwrap();

        queue
            .submit(&path, vec![Record::new("A1", vec![1, 2])])
            .unwrap();
        queue.flush();

        assert!(queue.is_idle());
        assert_eq!(read_document(&path).unwrap(), vec![Record::new("A1", vec![1, 2])]);
        let outcomes = queue.drain_outcomes();
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].is_ok());
        assert_eq!(outcomes[0].records, 1);
    }

    fn request(path: &str, identifier: &str) -> SaveRequest {
        SaveRequest {
            path: PathBuf::from(path),
            records: vec![Record::new(identifier, vec![])],
        }
    }

    fn waiting(slots: &Slots) -> Vec<(String, String)> {
        slots
            .waiting
            .iter()
            .map(|r| (r.path.display().to_string(), r.records[0].identifier.clone()))
            .collect()
    }

    #[test]
    fn test_push_supersedes_same_path() {
        let mut slots = Slots::default();
        slots.push(request("a.json", "old"));
        slots.push(request("b.json", "other"));
        slots.push(request("a.json", "new"));

        // one entry per path; the newer records take the older one's place
        assert_eq!(
            waiting(&slots),
            vec![
                ("a.json".to_string(), "new".to_string()),
                ("b.json".to_string(), "other".to_string()),
            ]
        );
    }

    #[test]
    fn test_push_does_not_supersede_write_in_flight() {
        let mut slots = Slots {
            writing: Some(PathBuf::from("a.json")),
            ..Slots::default()
        };
        slots.push(request("a.json", "next"));

        assert_eq!(waiting(&slots), vec![("a.json".to_string(), "next".to_string())]);
        assert!(slots.is_busy_with(Path::new("a.json")));
        assert!(!slots.is_busy_with(Path::new("b.json")));
        assert!(!slots.is_idle());
    }

    #[test]
    fn test_last_write_wins() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("out.json");
        let queue = SaveQueue::spawn(DEFAULT_INDENT).unwrap();

        for i in 0..20 {
            queue.submit(&path, vec![Record::new(format!("R{i}"), vec![i])]).unwrap();
        }
        queue.flush();

        assert_eq!(read_document(&path).unwrap(), vec![Record::new("R19", vec![19])]);
        assert!(queue.drain_outcomes().iter().all(SaveOutcome::is_ok));
    }

    #[test]
    fn test_flush_path_waits_for_that_path() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("out.json");
        let queue = SaveQueue::spawn(DEFAULT_INDENT).unwrap();

        queue.submit(&path, vec![Record::new("A1", vec![1])]).unwrap();
        queue.flush_path(&path);

        assert_eq!(read_document(&path).unwrap(), vec![Record::new("A1", vec![1])]);
    }

    #[test]
    fn test_other_paths_are_not_superseded() {
        let dir = tempdir().expect("Failed to create temp dir");
        let first = dir.path().join("first.json");
        let second = dir.path().join("second.json");
        let queue = SaveQueue::spawn(DEFAULT_INDENT).unwrap();

        queue.submit(&first, vec![Record::new("F", vec![])]).unwrap();
        queue.submit(&second, vec![Record::new("S", vec![])]).unwrap();
        queue.flush();

        assert_eq!(read_document(&first).unwrap()[0].identifier, "F");
        assert_eq!(read_document(&second).unwrap()[0].identifier, "S");
    }

    #[test]
    fn test_failed_write_is_reported() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("missing").join("out.json");
        let queue = SaveQueue::spawn(DEFAULT_INDENT).unwrap();

        queue.submit(&path, vec![Record::new("A1", vec![])]).unwrap();
        queue.flush();

        let outcomes = queue.drain_outcomes();
        assert_eq!(outcomes.len(), 1);
        assert!(!outcomes[0].is_ok());
        assert_eq!(outcomes[0].path, path);
    }

    #[test]
    fn test_drop_drains_pending_writes() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("out.json");
        {
            let queue = SaveQueue::spawn(DEFAULT_INDENT).unwrap();
            queue.submit(&path, vec![Record::new("A1", vec![])]).unwrap();
        }
        assert_eq!(read_document(&path).unwrap().len(), 1);
    }
}
