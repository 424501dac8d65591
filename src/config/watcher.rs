//! Input file watcher for re-resolution.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

/// A watcher that reports changes to the files a resolution reads.
pub struct ConfigWatcher {
    root: PathBuf,
    extra: Vec<PathBuf>,
    change_tx: mpsc::UnboundedSender<PathBuf>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher for `root`, plus any `extra` files (e.g. an override file).
    ///
    /// Returns the watcher and a receiver of changed paths.
    pub fn new(root: &Path, extra: Vec<PathBuf>) -> (Self, mpsc::UnboundedReceiver<PathBuf>) {
        let (change_tx, change_rx) = mpsc::unbounded_channel();

        (Self {
            root: root.to_path_buf(),
            extra,
            change_tx,
        }, change_rx)
    }

    /// Start watching in a background thread. Dropping the returned watcher stops it.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.change_tx.clone();
        let extra = self.extra.clone();

        let mut watcher = RecommendedWatcher::new(move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    if !(event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove()) {
                        return;
                    }
                    if let Some(path) = event.paths.into_iter().find(|p| is_watched_file(p, &extra)) {
                        tracing::info!(path = %path.display(), "Input change detected");
                        let _ = tx.send(path);
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            }
        }, Config::default().with_poll_interval(Duration::from_secs(2)))?;

        watcher.watch(&self.root, RecursiveMode::NonRecursive)?;
        for path in &self.extra {
            // extra files inside root are already covered
            if path.parent() != Some(self.root.as_path()) {
                watcher.watch(path, RecursiveMode::NonRecursive)?;
            }
        }

        tracing::info!(root = ?self.root, extra = ?self.extra, "Config watcher started");
        Ok(watcher)
    }
}

/// Returns true for env files, `package.json`, and any of the `extra` files.
pub fn is_watched_file(path: &Path, extra: &[PathBuf]) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name == ".env" || name.starts_with(".env.") || name == "package.json" {
        return true;
    }
    extra
        .iter()
        .any(|p| p == path || p.file_name() == path.file_name())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watched_files() {
        let extra = vec![PathBuf::from("config/overrides.toml")];

        assert!(is_watched_file(Path::new("/app/.env"), &extra));
        assert!(is_watched_file(Path::new("/app/.env.development.local"), &extra));
        assert!(is_watched_file(Path::new("/app/package.json"), &extra));
        assert!(is_watched_file(Path::new("/app/config/overrides.toml"), &extra));

        assert!(!is_watched_file(Path::new("/app/.envrc"), &extra));
        assert!(!is_watched_file(Path::new("/app/src/main.ts"), &extra));
        assert!(!is_watched_file(Path::new("/"), &extra));
    }
}
