//! Domain types for doccat.
//!
//! This module contains the derived data structures:
//! - IndexEntry / SearchIndex: the flat full-text search index
//! - NormalizedRecord: canonical front-matter + body agent documents

pub mod index;
pub mod record;

// Re-export commonly used types
pub use index::{IndexEntry, SearchIndex};
pub use record::{NormalizedRecord, DEFAULT_RECORD_TYPE, FRONT_MATTER_MARKER};
