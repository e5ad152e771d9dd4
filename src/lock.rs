//! File locking for omw
//!
//! Mutations of the timesheet take an advisory exclusive lock (fs2/flock)
//! on the timesheet path itself. Acquisition never waits: if another omw
//! process holds the lock the caller gets `Error::LockFailed` and decides
//! whether to retry. The lock is released when the guard is dropped, so
//! every exit path (including `?`) releases it.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use fs2::FileExt;

use crate::error::{Error, Result};

fn is_lock_contended(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::WouldBlock {
        return true;
    }

    // On Windows, fs2/libc can surface lock/sharing violations as "Other".
    #[cfg(windows)]
    {
        matches!(err.raw_os_error(), Some(32) | Some(33))
    }
    #[cfg(not(windows))]
    {
        false
    }
}

/// A file lock guard that releases the lock when dropped
#[derive(Debug)]
pub struct FileLock {
    file: File,
}

impl FileLock {
    /// Try to acquire a lock without waiting
    ///
    /// The file is created if it doesn't exist. Returns `Ok(Some(lock))` if
    /// acquired, `Ok(None)` if another handle holds it, or `Err` for other
    /// errors.
    pub fn try_acquire(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(FileLock { file })),
            Err(e) if is_lock_contended(&e) => Ok(None),
            Err(e) => Err(Error::Io(e)),
        }
    }

    /// Acquire the lock or fail immediately with `Error::LockFailed`
    pub fn acquire(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match Self::try_acquire(path)? {
            Some(lock) => {
                tracing::debug!(path = %path.display(), "acquired file lock");
                Ok(lock)
            }
            None => Err(Error::LockFailed(path.to_path_buf())),
        }
    }

    /// Read the whole locked file from the start
    pub fn read_to_string(&mut self) -> Result<String> {
        let mut content = String::new();
        self.file.seek(SeekFrom::Start(0))?;
        self.file.read_to_string(&mut content)?;
        Ok(content)
    }

    /// Replace the locked file's content through the held handle
    ///
    /// Writing in place (rather than rename) keeps the lock on the same
    /// inode other omw processes open.
    pub fn rewrite(&mut self, data: &[u8]) -> Result<()> {
        self.file.set_len(0)?;
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(data)?;
        self.file.sync_all()?;
        Ok(())
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Unlock the file - ignore errors during drop
        let _ = self.file.unlock();
    }
}
