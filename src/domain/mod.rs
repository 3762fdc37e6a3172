//! Domain types for folio.
//!
//! This module contains the core data structures:
//! - ContentKind: The closed set of content categories
//! - ContentItem: A loaded document with its metadata and body

pub mod item;
pub mod kind;

// Re-export commonly used types
pub use item::{parse_date, reading_time, sort_newest_first, ContentItem};
pub use kind::ContentKind;
