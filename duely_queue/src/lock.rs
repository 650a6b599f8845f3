use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{QueueError, Result};

/// Lock file guarding a queue document: `<queue file name>.lock` beside it.
#[must_use]
pub fn lock_path(queue_path: &Path) -> PathBuf {
    let mut name = queue_path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".lock");
    queue_path.with_file_name(name)
}

/// Exclusive lock on a queue document. Released when dropped.
#[derive(Debug)]
pub struct QueueLock {
    _file: File,
    path: PathBuf,
}

impl QueueLock {
    /// Try to take the lock without blocking.
    ///
    /// Fails with [`QueueError::Locked`] while another holder exists, in this
    /// process or another one.
    pub fn acquire(queue_path: &Path) -> Result<Self> {
        let path = lock_path(queue_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&path)?;

        file.try_lock_exclusive()
            .map_err(|_| QueueError::Locked(queue_path.to_path_buf()))?;

        debug!("Acquired queue lock {}", path.display());
        Ok(Self { _file: file, path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_path_sits_beside_queue() {
        let p = lock_path(Path::new("/data/duely/commitment_queue.json"));
        assert_eq!(p, PathBuf::from("/data/duely/commitment_queue.json.lock"));
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn second_acquire_fails_until_drop() {
        let dir = tempfile::tempdir().expect("tempdir");
        let queue = dir.path().join("queue.json");

        let lock = QueueLock::acquire(&queue).expect("first acquire");
        assert!(lock.path().exists());
        assert!(matches!(
            QueueLock::acquire(&queue),
            Err(QueueError::Locked(_))
        ));
        drop(lock);

        let _again = QueueLock::acquire(&queue).expect("acquire after drop");
    }
}
