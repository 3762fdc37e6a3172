//! Content loading and querying.
//!
//! Documents live in one directory per kind under the content root, each
//! file a YAML metadata block followed by the body.
//!
//! # Storage Layout
//!
//! ```text
//! content/
//! ├── thoughts/
//! │   └── <slug>.md
//! ├── blog/
//! │   └── <slug>.mdx
//! ├── projects/
//! ├── talks/
//! └── now/
//! ```

pub mod loader;
pub mod repository;
pub mod source;

pub use loader::{ContentError, LoadReport, LoaderOptions, Severity};
pub use repository::ContentRepository;
pub use source::{ContentSource, FileSource, SourceKind, StaticSource};
