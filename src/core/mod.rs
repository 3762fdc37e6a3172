//! Snapshot ownership and rebuild triggers.
//!
//! This module contains:
//! - ContentStore: The current repository + index snapshot, rebuilt atomically
//! - ContentWatcher: File watcher that triggers rebuilds

pub mod store;
pub mod watcher;

// Re-export commonly used types
pub use store::{fingerprint, ContentStore, Snapshot};
pub use watcher::{rebuild_now, ContentWatcher, RebuildEvent, WatchConfig, WatchHandle, WatcherError};
