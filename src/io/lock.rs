use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// How long a store write waits for another process before giving up
pub const WRITE_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

const RETRY_INTERVAL: Duration = Duration::from_millis(10);

/// Error type for lock operations
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not open lock file {path}: {source}")]
    Open { path: PathBuf, source: io::Error },
    #[error("timed out waiting for {path}: another nt process is writing the store")]
    Timeout { path: PathBuf },
}

/// Exclusive advisory lock on a sidecar file next to the store
/// (`store.json` → `store.json.lock`).
///
/// The TUI and any number of CLI invocations may write the same store; each
/// read-merge-write cycle holds the lock. The sidecar is left in place and
/// the lock is released when the guard drops and the descriptor closes.
#[derive(Debug)]
pub struct FileLock {
    _file: File,
}

impl FileLock {
    pub fn path_for(target: &Path) -> PathBuf {
        let mut name = target.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".lock");
        target.with_file_name(name)
    }

    /// Block (polling) until the lock guarding `target` is ours, or `timeout` passes.
    pub fn acquire(target: &Path, timeout: Duration) -> Result<Self, LockError> {
        let path = Self::path_for(target);
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|source| LockError::Open {
                path: path.clone(),
                source,
            })?;

        let deadline = Instant::now() + timeout;
        while !try_lock_exclusive(&file) {
            if Instant::now() >= deadline {
                return Err(LockError::Timeout { path });
            }
            std::thread::sleep(RETRY_INTERVAL);
        }
        Ok(FileLock { _file: file })
    }

    pub fn acquire_default(target: &Path) -> Result<Self, LockError> {
        Self::acquire(target, WRITE_LOCK_TIMEOUT)
    }
}

#[cfg(unix)]
fn try_lock_exclusive(file: &File) -> bool {
    use std::os::unix::io::AsRawFd;
    // SAFETY: the descriptor is owned by `file` and open for the whole call
    unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) == 0 }
}

#[cfg(not(unix))]
fn try_lock_exclusive(_file: &File) -> bool {
    true
}
