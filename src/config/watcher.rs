//! Configuration file watcher for hot reload.
//!
//! Watches the file's parent directory rather than the file itself: editors
//! that save through a temp file and rename would otherwise leave the watch
//! pointing at a deleted inode.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::SolrConfig;

/// Reloads a [`SolrConfig`] whenever its file changes.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<SolrConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and a receiver of freshly loaded, valid configs.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<SolrConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a filesystem event should trigger a reload of `path`.
    fn is_relevant(event: &Event, path: &Path) -> bool {
        (event.kind.is_modify() || event.kind.is_create())
            && event.paths.iter().any(|p| p.file_name() == path.file_name())
    }

    /// Start watching. Updates stop when the returned watcher is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        if !self.path.is_file() {
            return Err(notify::Error::path_not_found().add_path(self.path.clone()));
        }
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let path = self.path.clone();
        let tx = self.update_tx;
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if Self::is_relevant(&event, &path) => match load_config(&path) {
                    Ok(config) => {
                        tracing::info!(path = ?path, "Config file changed, reloaded");
                        let _ = tx.send(config);
                    }
                    Err(e) => {
                        tracing::error!(path = ?path, error = %e, "Config reload failed, keeping current settings");
                    }
                },
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}
