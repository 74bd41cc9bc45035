//! Configuration file watcher for hot reload.

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::config::loader::{parse_config, ConfigError};
use crate::config::schema::ConsumerConfig;

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<ConsumerConfig>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<ConsumerConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file in a background thread.
    ///
    /// The returned watcher must be kept alive for updates to keep flowing.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let mut reloader = Reloader {
            path: self.path.clone(),
            tx: self.update_tx,
            last_content: fs::read_to_string(&self.path).ok(),
        };

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    reloader.reload();
                }
                Ok(_) => {}
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}

/// Re-reads the file and forwards configs whose text actually changed.
///
/// A single save usually fires several modify events.
struct Reloader {
    path: PathBuf,
    tx: mpsc::UnboundedSender<ConsumerConfig>,
    last_content: Option<String>,
}

impl Reloader {
    fn reload(&mut self) {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = ?self.path, error = %ConfigError::Io(e), "Config file unreadable");
                return;
            }
        };

        if self.last_content.as_deref() == Some(content.as_str()) {
            return;
        }

        tracing::info!("Config file change detected, reloading...");
        match parse_config(&content) {
            Ok(new_config) => {
                self.last_content = Some(content);
                let _ = self.tx.send(new_config);
            }
            Err(e) => {
                tracing::error!("Failed to reload config: {}. Keeping current configuration.", e);
            }
        }
    }
}
