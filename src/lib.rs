//! doccat - documentation catalog tooling
//!
//! Derives two products from a catalog of textual artifacts:
//! a flat full-text search index, and normalized agent records.
//!
//! # Architecture
//!
//! Both pipelines are single-pass batch transformations:
//! - The indexer walks the catalog in declaration order, cleans each
//!   artifact's text and replaces the index artifact as a whole
//! - The normalizer converts raw agent records into front-matter markdown
//!   and removes each source once its replacement is committed
//!
//! # Modules
//!
//! - `adapters`: Documentation server API client (version, bearer auth)
//! - `catalog`: Catalog loading and content storage
//! - `core`: Indexer, record scanner, normalizer, text helpers
//! - `domain`: Data structures (IndexEntry, SearchIndex, NormalizedRecord)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Build the search index
//! doccat index --catalog doc_registry.json --content-root docs
//!
//! # Convert agents/*.yaml into agents/*.md
//! doccat convert --dir agents
//!
//! # Search the index
//! doccat search kubernetes
//! ```

pub mod adapters;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use catalog::{Catalog, CatalogEntry, ContentSource, FsContentStore};
pub use core::{IndexReport, Indexer, Normalizer};
pub use domain::{IndexEntry, NormalizedRecord, SearchIndex};
