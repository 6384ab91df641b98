//! Core package watcher implementation.

use easel_common::ConfigError;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Watches package roots and reports which package changed.
pub struct PackageWatcher {
    roots: Vec<PathBuf>,
    debounce: Duration,
}

impl PackageWatcher {
    pub fn new(roots: Vec<PathBuf>, debounce: Duration) -> Result<Self, ConfigError> {
        if roots.is_empty() {
            return Err(ConfigError::WatchError("no package roots to watch".into()));
        }
        for root in &roots {
            if !root.exists() {
                warn!("package root {} does not exist", root.display());
            }
        }
        Ok(Self { roots, debounce })
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// The watched root containing `path`, preferring the deepest match.
    pub(crate) fn root_for(&self, path: &Path) -> Option<&PathBuf> {
        self.roots
            .iter()
            .filter(|root| path.starts_with(root))
            .max_by_key(|root| root.components().count())
    }

    /// Watch until the receiving side of `tx` is dropped.
    ///
    /// Every debounced burst sends each affected package root once.
    pub async fn watch(&self, tx: mpsc::Sender<PathBuf>) -> Result<(), ConfigError> {
        let (notify_tx, mut notify_rx) = mpsc::channel::<PathBuf>(64);

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| match result {
                Ok(event) => {
                    if !matches!(
                        event.kind,
                        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                    ) {
                        return;
                    }
                    for path in event.paths {
                        let _ = notify_tx.try_send(path);
                    }
                }
                Err(e) => error!("package watcher error: {e}"),
            },
            notify::Config::default(),
        )
        .map_err(|e| ConfigError::WatchError(format!("failed to create watcher: {e}")))?;

        for root in &self.roots {
            watcher
                .watch(root, RecursiveMode::Recursive)
                .map_err(|e| {
                    ConfigError::WatchError(format!("failed to watch {}: {e}", root.display()))
                })?;
            info!("watching package root {}", root.display());
        }

        loop {
            let first = match notify_rx.recv().await {
                Some(path) => path,
                None => break,
            };

            let mut changed = BTreeSet::new();
            if let Some(root) = self.root_for(&first) {
                changed.insert(root.clone());
            }

            let debounce = tokio::time::sleep(self.debounce);
            tokio::pin!(debounce);
            loop {
                tokio::select! {
                    _ = &mut debounce => break,
                    msg = notify_rx.recv() => match msg {
                        Some(path) => {
                            if let Some(root) = self.root_for(&path) {
                                changed.insert(root.clone());
                            }
                        }
                        None => return Ok(()),
                    }
                }
            }

            for root in changed {
                debug!("package change detected in {}", root.display());
                if tx.send(root).await.is_err() {
                    debug!("package change receiver dropped, stopping watcher");
                    return Ok(());
                }
            }
        }

        Ok(())
    }
}
