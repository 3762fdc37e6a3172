//! Snapshot store.
//!
//! Holds the current repository and its search index as one immutable
//! [`Snapshot`]. A rebuild loads everything from the source into a fresh
//! snapshot and then swaps the shared pointer, so readers always see either
//! the old generation or the new one in full.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};

use crate::config::ResolvedConfig;
use crate::domain::ContentItem;
use crate::library::{ContentError, ContentRepository, ContentSource, SourceKind, StaticSource};
use crate::search::{SearchIndex, SearchOptions};

/// One complete, immutable build of the content
#[derive(Debug)]
pub struct Snapshot {
    /// Increments on every rebuild, starting at 1; never decreases in the
    /// published snapshot
    pub generation: u64,

    pub repository: ContentRepository,

    pub index: SearchIndex,

    /// Everything reported while loading this generation
    pub diagnostics: Vec<ContentError>,

    /// SHA256 over the loaded items, hex encoded
    pub fingerprint: String,

    pub built_at: DateTime<Utc>,
}

impl Snapshot {
    /// Diagnostics that caused a file to be skipped
    pub fn errors(&self) -> impl Iterator<Item = &ContentError> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }
}

/// Owner of the current snapshot
pub struct ContentStore {
    source: Box<dyn ContentSource>,
    search: SearchOptions,
    current: RwLock<Arc<Snapshot>>,
    generation: AtomicU64,
}

impl ContentStore {
    /// Build the first generation from `source`
    pub fn open(source: Box<dyn ContentSource>, search: SearchOptions) -> Self {
        let first = build_snapshot(source.as_ref(), &search, 1);
        Self {
            source,
            search,
            current: RwLock::new(Arc::new(first)),
            generation: AtomicU64::new(1),
        }
    }

    /// Open a store using the source and search settings from configuration
    pub fn from_config(config: &ResolvedConfig) -> Self {
        let source: Box<dyn ContentSource> = match config.source {
            SourceKind::Files => Box::new(config.file_source()),
            SourceKind::Static => Box::new(StaticSource::demo()),
        };
        Self::open(source, config.search.clone())
    }

    /// The current snapshot. Holding it keeps that generation alive even
    /// across later rebuilds.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Re-scan the source and replace the current snapshot.
    ///
    /// Overlapping rebuilds may finish out of order; a build older than the
    /// published one is discarded and the newer snapshot is returned.
    #[instrument(skip(self), fields(source = self.source.name()))]
    pub fn rebuild(&self) -> Arc<Snapshot> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let next = Arc::new(build_snapshot(self.source.as_ref(), &self.search, generation));

        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if guard.generation > next.generation {
            debug!(
                generation,
                current = guard.generation,
                "Discarding rebuild superseded by a newer generation"
            );
            return Arc::clone(&guard);
        }
        *guard = Arc::clone(&next);
        next
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }
}

fn build_snapshot(source: &dyn ContentSource, search: &SearchOptions, generation: u64) -> Snapshot {
    let (repository, diagnostics) = ContentRepository::build(source);
    let index = SearchIndex::build(&repository, search.clone());
    let fingerprint = fingerprint(repository.get_all().iter().map(|i| &**i));

    let skipped = diagnostics.iter().filter(|d| d.is_error()).count();
    if skipped > 0 {
        warn!(generation, skipped, "Some content files were skipped");
    }
    info!(
        generation,
        items = repository.len(),
        indexed = index.len(),
        "Built content snapshot"
    );

    Snapshot {
        generation,
        repository,
        index,
        diagnostics,
        fingerprint,
        built_at: Utc::now(),
    }
}

/// Digest of the identity, metadata and body of every item
pub fn fingerprint<'a>(items: impl IntoIterator<Item = &'a ContentItem>) -> String {
    let mut hasher = Sha256::new();
    for item in items {
        // Identity fields stand in if encoding fails
        let encoded = serde_json::to_vec(item)
            .unwrap_or_else(|_| format!("{}/{}", item.kind, item.slug).into_bytes());
        hasher.update(&encoded);
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}
