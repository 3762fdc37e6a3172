//! Content tree watcher.
//!
//! Watches the content root for changes to content files and rebuilds the
//! store when they settle. Each rebuild replaces the whole snapshot; there
//! is no incremental update.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;
use thiserror::Error;
use tokio::sync::mpsc;

use super::store::ContentStore;

/// Errors that can occur with the watcher
#[derive(Debug, Error)]
pub enum WatcherError {
    #[error("Content root does not exist: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

/// Configuration for the watcher
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Content root to watch (recursively)
    pub root: PathBuf,

    /// Quiet period before a batch of changes triggers a rebuild
    pub debounce: Duration,

    /// Extensions that count as content
    pub extensions: Vec<String>,
}

impl WatchConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            debounce: Duration::from_millis(500),
            extensions: vec!["md".to_string(), "mdx".to_string()],
        }
    }

    /// Check if the content root exists
    pub fn validate(&self) -> Result<(), WatcherError> {
        if !self.root.is_dir() {
            return Err(WatcherError::DirectoryNotFound(self.root.clone()));
        }
        Ok(())
    }

    /// Whether a change to `path` can affect the content.
    ///
    /// Paths without an extension are treated as directories, since a kind
    /// directory appearing or vanishing changes the result too.
    pub fn is_relevant(&self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)),
            None => true,
        }
    }
}

/// Emitted after every rebuild triggered by the watcher
#[derive(Debug, Clone)]
pub struct RebuildEvent {
    pub generation: u64,

    /// Whether the loaded content differs from the previous generation
    pub changed: bool,

    pub items: usize,

    /// Files skipped in the new generation
    pub errors: usize,

    pub rebuilt_at: DateTime<Utc>,
}

/// Rebuilds a store whenever its content tree changes
pub struct ContentWatcher {
    config: WatchConfig,
}

impl ContentWatcher {
    pub fn with_config(config: WatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    /// Watch the content root until the returned handle is stopped
    pub async fn watch(
        &self,
        store: Arc<ContentStore>,
    ) -> Result<(mpsc::Receiver<RebuildEvent>, WatchHandle)> {
        self.config.validate()?;

        let (event_tx, event_rx) = mpsc::channel::<RebuildEvent>(16);
        let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);

        let config = self.config.clone();

        let handle = tokio::spawn(async move {
            if let Err(e) = run_watcher(config, store, event_tx, &mut stop_rx).await {
                tracing::error!("Watcher error: {}", e);
            }
        });

        Ok((
            event_rx,
            WatchHandle {
                stop_tx,
                task: handle,
            },
        ))
    }
}

/// Handle to control the watcher
pub struct WatchHandle {
    stop_tx: mpsc::Sender<()>,
    task: tokio::task::JoinHandle<()>,
}

impl WatchHandle {
    /// Stop the watcher
    pub async fn stop(self) -> Result<()> {
        let _ = self.stop_tx.send(()).await;
        self.task.await?;
        Ok(())
    }
}

/// Rebuild `store` off the async runtime and describe the result
pub async fn rebuild_now(store: &Arc<ContentStore>) -> Result<RebuildEvent> {
    let previous = store.snapshot().fingerprint.clone();
    let worker = Arc::clone(store);
    let snapshot = tokio::task::spawn_blocking(move || worker.rebuild()).await?;

    Ok(RebuildEvent {
        generation: snapshot.generation,
        changed: snapshot.fingerprint != previous,
        items: snapshot.repository.len(),
        errors: snapshot.errors().count(),
        rebuilt_at: snapshot.built_at,
    })
}

/// Internal watcher loop
async fn run_watcher(
    config: WatchConfig,
    store: Arc<ContentStore>,
    event_tx: mpsc::Sender<RebuildEvent>,
    stop_rx: &mut mpsc::Receiver<()>,
) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    let mut debouncer = new_debouncer(config.debounce, tx)?;
    debouncer.watcher().watch(&config.root, RecursiveMode::Recursive)?;

    tracing::info!("Watching {} for content changes", config.root.display());

    loop {
        if stop_rx.try_recv().is_ok() {
            tracing::info!("Watcher stopping...");
            break;
        }

        match rx.recv_timeout(Duration::from_millis(250)) {
            Ok(Ok(events)) => {
                let relevant = events.iter().any(|e| config.is_relevant(&e.path));
                if !relevant {
                    continue;
                }

                match rebuild_now(&store).await {
                    Ok(event) => {
                        if event.changed {
                            tracing::info!(generation = event.generation, "Content changed, snapshot rebuilt");
                        } else {
                            tracing::debug!(generation = event.generation, "Rebuilt with no content change");
                        }
                        if event_tx.send(event).await.is_err() {
                            tracing::debug!("Rebuild receiver dropped");
                        }
                    }
                    Err(e) => tracing::warn!("Rebuild failed: {}", e),
                }
            }
            Ok(Err(e)) => {
                tracing::warn!("Watcher error: {:?}", e);
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                tracing::error!("Watcher channel disconnected");
                break;
            }
        }

        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::FileSource;
    use crate::search::SearchOptions;
    use tempfile::TempDir;

    #[test]
    fn test_relevant_paths() {
        let config = WatchConfig::new("/content");
        assert!(config.is_relevant(Path::new("/content/blog/post.md")));
        assert!(config.is_relevant(Path::new("/content/blog/post.MDX")));
        assert!(config.is_relevant(Path::new("/content/talks")));
        assert!(!config.is_relevant(Path::new("/content/blog/.post.md.swp")));
        assert!(!config.is_relevant(Path::new("/content/blog/cover.png")));
    }

    #[test]
    fn test_validate_missing_root() {
        let config = WatchConfig::new("/definitely/not/here");
        assert!(matches!(config.validate(), Err(WatcherError::DirectoryNotFound(_))));
    }

    #[tokio::test]
    async fn test_rebuild_now_detects_change() {
        let temp = TempDir::new().unwrap();
        let blog = temp.path().join("blog");
        std::fs::create_dir_all(&blog).unwrap();
        std::fs::write(blog.join("one.md"), "---\ntitle: One\ndate: 2024-01-01\n---\nbody").unwrap();

        let store = Arc::new(ContentStore::open(
            Box::new(FileSource::new(temp.path())),
            SearchOptions::default(),
        ));

        let unchanged = rebuild_now(&store).await.unwrap();
        assert_eq!(unchanged.generation, 2);
        assert!(!unchanged.changed);

        std::fs::write(blog.join("two.md"), "---\ntitle: Two\ndate: 2024-02-01\n---\nbody").unwrap();

        let changed = rebuild_now(&store).await.unwrap();
        assert_eq!(changed.generation, 3);
        assert!(changed.changed);
        assert_eq!(changed.items, 2);
    }
}
