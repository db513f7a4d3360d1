use std::ffi::OsString;
use std::path::Path;
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Events sent from the file watcher to the TUI event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// The store file was written, replaced, or removed on disk.
    Changed,
}

/// Watches the store file so edits from other `nt` processes show up live.
///
/// The parent directory is watched rather than the file itself: atomic
/// writes replace the file, which would orphan a watch on the old inode.
pub struct StoreWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<StoreEvent>,
}

impl StoreWatcher {
    pub fn start(store_path: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let file_name: OsString = store_path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        let dir = match store_path.parent() {
            Some(d) if !d.as_os_str().is_empty() => d.to_path_buf(),
            _ => std::path::PathBuf::from("."),
        };

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(_) => return,
                };
                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }
                // Temp files and the lock file share the directory; only the
                // store file itself matters.
                let relevant = event
                    .paths
                    .iter()
                    .any(|p| p.file_name() == Some(file_name.as_os_str()));
                if relevant {
                    let _ = tx.send(StoreEvent::Changed);
                }
            },
            Config::default(),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        Ok(StoreWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking poll. Bursts of events collapse into one `Changed`.
    pub fn poll(&self) -> Option<StoreEvent> {
        let mut seen = None;
        while let Ok(evt) = self.rx.try_recv() {
            seen = Some(evt);
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    fn wait_for_event(watcher: &StoreWatcher) -> Option<StoreEvent> {
        let start = Instant::now();
        while start.elapsed() < Duration::from_secs(3) {
            if let Some(evt) = watcher.poll() {
                return Some(evt);
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        None
    }

    #[test]
    fn reports_store_writes() {
        let tmp = TempDir::new().unwrap();
        let store = tmp.path().join("store.json");
        let watcher = StoreWatcher::start(&store).unwrap();

        crate::io::store::atomic_write(&store, b"{}").unwrap();
        assert_eq!(wait_for_event(&watcher), Some(StoreEvent::Changed));
    }

    #[test]
    fn poll_is_empty_when_quiet() {
        let tmp = TempDir::new().unwrap();
        let watcher = StoreWatcher::start(&tmp.path().join("store.json")).unwrap();
        assert_eq!(watcher.poll(), None);
    }
}
