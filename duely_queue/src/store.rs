use chrono::{DateTime, NaiveDate, Utc};
use duely_core::{Commitment, Queue, Status};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::{QueueError, QueueLock, Result};

enum Loaded {
    Missing,
    Found(Queue),
    Unreadable(String),
}

fn read(path: &Path) -> Loaded {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Loaded::Missing,
        Err(e) => return Loaded::Unreadable(e.to_string()),
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Loaded::Missing;
    }
    match serde_json::from_slice(&bytes) {
        Ok(queue) => Loaded::Found(queue),
        Err(e) => Loaded::Unreadable(e.to_string()),
    }
}

/// Read the queue document at `path`.
///
/// A missing, empty, unreadable or malformed file yields a fresh queue
/// rather than an error.
#[must_use]
pub fn load_queue(path: &Path) -> Queue {
    match read(path) {
        Loaded::Found(queue) => queue,
        Loaded::Missing => {
            debug!("No queue at {}, starting fresh", path.display());
            Queue::default()
        }
        Loaded::Unreadable(reason) => {
            warn!("Queue at {} is unreadable ({reason}), starting fresh", path.display());
            Queue::default()
        }
    }
}

/// Write the whole queue document atomically: temp file in the same
/// directory, fsync, then rename over `path`.
pub fn save_queue(path: &Path, queue: &Queue) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let data = serde_json::to_vec_pretty(queue)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(&data)?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| QueueError::Io(e.error))?;
    Ok(())
}

/// Path the previous document is copied to when it cannot be parsed:
/// `<name>.corrupt-<UTC timestamp>`, with a counter appended if that name
/// is already taken, so an earlier copy is never overwritten.
fn quarantine_path(path: &Path, at: DateTime<Utc>) -> PathBuf {
    let mut base = path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    base.push(format!(".corrupt-{}", at.format("%Y%m%dT%H%M%S")));

    let mut candidate = path.with_file_name(&base);
    let mut n = 1u32;
    while candidate.exists() {
        let mut name = base.clone();
        name.push(format!("-{n}"));
        candidate = path.with_file_name(name);
        n += 1;
    }
    candidate
}

/// An open queue document, held for the duration of one scan.
///
/// Opening takes the queue's lock file; the lock is released on drop.
/// Mutations stay in memory until [`QueueStore::save`] or
/// [`QueueStore::close`].
#[derive(Debug)]
pub struct QueueStore {
    path: PathBuf,
    queue: Queue,
    dirty: bool,
    _lock: QueueLock,
}

impl QueueStore {
    /// Lock and load the queue at `path`.
    ///
    /// An unparsable document is copied aside to `<name>.corrupt-<timestamp>`
    /// before the store starts from a fresh queue, so the next save cannot
    /// destroy it.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let lock = QueueLock::acquire(&path)?;

        let queue = match read(&path) {
            Loaded::Found(queue) => queue,
            Loaded::Missing => Queue::default(),
            Loaded::Unreadable(reason) => {
                let aside = quarantine_path(&path, Utc::now());
                warn!(
                    "Queue at {} is unreadable ({reason}); keeping a copy at {}",
                    path.display(),
                    aside.display()
                );
                if let Err(e) = fs::copy(&path, &aside) {
                    warn!("Could not copy unreadable queue aside: {e}");
                }
                Queue::default()
            }
        };

        info!(
            "Opened queue {} ({} commitments)",
            path.display(),
            queue.len()
        );
        Ok(Self {
            path,
            queue,
            dirty: false,
            _lock: lock,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn queue(&self) -> &Queue {
        &self.queue
    }

    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Id the next commitment created on `today` should get. Accounts for
    /// appended commitments that have not been saved yet.
    #[must_use]
    pub fn next_id(&self, today: NaiveDate) -> String {
        self.queue.next_commitment_id(today)
    }

    /// Append a commitment. The only mutation the detection pipeline uses.
    pub fn append(&mut self, commitment: Commitment) -> Result<()> {
        if self.queue.get(&commitment.id).is_some() {
            return Err(QueueError::DuplicateId(commitment.id));
        }
        debug!("Queued {} ({})", commitment.id, commitment.kind);
        self.queue.push(commitment);
        self.dirty = true;
        Ok(())
    }

    /// Record a review decision on a queued commitment.
    pub fn set_status(&mut self, id: &str, status: Status, at: DateTime<Utc>) -> Result<Status> {
        let previous = self
            .queue
            .transition(id, status, at)
            .ok_or_else(|| QueueError::NotFound(id.to_string()))?;
        self.dirty = true;
        Ok(previous)
    }

    pub fn mark_scanned(&mut self, at: DateTime<Utc>) {
        self.queue.last_scan = Some(at);
        self.dirty = true;
    }

    pub fn save(&mut self) -> Result<()> {
        save_queue(&self.path, &self.queue)?;
        self.dirty = false;
        info!(
            "Saved queue {} ({} commitments)",
            self.path.display(),
            self.queue.len()
        );
        Ok(())
    }

    /// Flush pending changes and release the lock.
    pub fn close(mut self) -> Result<Queue> {
        if self.dirty {
            self.save()?;
        }
        Ok(self.queue)
    }
}
