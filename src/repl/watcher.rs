use crossbeam_channel::Sender;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Watches layer-set documents and forwards change events to a channel.
/// notify runs the callbacks on its own threads.
pub struct DocumentWatcher {
    watcher: RecommendedWatcher,
    paths: HashSet<PathBuf>,
}

impl DocumentWatcher {
    pub fn new(tx: Sender<notify::Result<Event>>) -> notify::Result<Self> {
        let watcher = notify::recommended_watcher(move |res| {
            // Receiver dropped means the REPL is shutting down
            let _ = tx.send(res);
        })?;

        Ok(Self {
            watcher,
            paths: HashSet::new(),
        })
    }

    /// Start watching `path`. Returns false if it was already watched.
    pub fn watch<P: AsRef<Path>>(&mut self, path: P) -> notify::Result<bool> {
        let path = path.as_ref().to_path_buf();
        if self.paths.contains(&path) {
            return Ok(false);
        }
        self.watcher.watch(&path, RecursiveMode::NonRecursive)?;
        self.paths.insert(path);
        Ok(true)
    }

    pub fn unwatch<P: AsRef<Path>>(&mut self, path: P) -> notify::Result<()> {
        self.paths.remove(path.as_ref());
        self.watcher.unwatch(path.as_ref())
    }

    pub fn watched(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use tempfile::NamedTempFile;

    #[test]
    fn test_watch_is_idempotent() {
        let (tx, _rx) = unbounded();
        let mut watcher = DocumentWatcher::new(tx).unwrap();
        let file = NamedTempFile::new().unwrap();

        assert!(watcher.watch(file.path()).unwrap());
        assert!(!watcher.watch(file.path()).unwrap());
        assert_eq!(watcher.watched().count(), 1);

        watcher.unwatch(file.path()).unwrap();
        assert_eq!(watcher.watched().count(), 0);
    }
}
