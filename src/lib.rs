//! folio - content repository and fuzzy search for a personal site
//!
//! Loads markdown content (thoughts, blog posts, projects, talks and a
//! "now" page) from a content tree, keeps it in an immutable in-memory
//! snapshot and answers weighted fuzzy queries over it.
//!
//! # Architecture
//!
//! The system is built around whole-snapshot rebuilds:
//! - A content source loads every kind; bad files are skipped and reported
//! - The repository holds the loaded items, sorted newest first
//! - The search index is built from the same repository in the same snapshot
//! - A rebuild replaces the snapshot atomically; readers never see a mix
//!
//! # Modules
//!
//! - `domain`: Data structures (ContentKind, ContentItem)
//! - `library`: Loading (sources, front matter parsing) and the repository
//! - `search`: Fuzzy index, query service and stale-result suppression
//! - `core`: Snapshot store and file watcher
//! - `config`: Configuration file and environment overrides
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Most recent published items
//! folio recent --limit 3
//!
//! # Fuzzy search
//! folio search "rust async"
//!
//! # Report files that failed to load
//! folio check
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod library;
pub mod search;

// Re-export main types at crate root for convenience
pub use core::{ContentStore, ContentWatcher, Snapshot, WatchConfig};
pub use domain::{ContentItem, ContentKind};
pub use library::{ContentError, ContentRepository, ContentSource, FileSource, SourceKind, StaticSource};
pub use search::{SearchHit, SearchIndex, SearchOptions, SearchResponse, SearchService, SearchSession};
