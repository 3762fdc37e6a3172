//! Fuzzy full-text search over published content.
//!
//! - `fuzzy`: Approximate substring edit distance
//! - `index`: Weighted per-field index built from a repository
//! - `service`: Query entry point over the current snapshot
//! - `session`: Ticketing for dropping stale interactive responses

pub mod fuzzy;
pub mod index;
pub mod service;
pub mod session;

pub use index::{FieldWeights, SearchField, SearchHit, SearchIndex, SearchOptions};
pub use service::{run_query, SearchResponse, SearchService};
pub use session::{QueryTicket, SearchSession};
