//! Search index builder.
//!
//! Walks the catalog in declaration order, fetches each artifact from a
//! [`ContentSource`], cleans its text and produces one [`IndexEntry`] per
//! available artifact. Per-entry failures are recorded and skipped; only
//! writing the final artifact can fail the run.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::text::{clean_for_index, MAX_CONTENT_CHARS};
use super::write_atomic;
use crate::catalog::{Catalog, ContentError, ContentSource};
use crate::domain::IndexEntry;

/// Fatal indexer errors
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Failed to serialize search index: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write search index {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Why a catalog entry produced no index entry
#[derive(Debug)]
pub enum SkipReason {
    /// The content source refused or failed to serve the artifact
    Content(ContentError),

    /// An earlier catalog entry already indexed this path
    DuplicatePath,
}

impl SkipReason {
    /// Whether the skip points at a real problem rather than an absent file
    pub fn is_failure(&self) -> bool {
        matches!(self, SkipReason::Content(ContentError::Io { .. }))
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Content(e) => write!(f, "{e}"),
            SkipReason::DuplicatePath => write!(f, "duplicate catalog path"),
        }
    }
}

/// A catalog entry that was not indexed
#[derive(Debug)]
pub struct SkippedEntry {
    pub category: String,
    pub path: String,
    pub reason: SkipReason,
}

/// Outcome of an index build
#[derive(Debug, Default)]
pub struct IndexReport {
    /// Entries in catalog declaration order
    pub entries: Vec<IndexEntry>,

    /// Entries left out, in catalog declaration order
    pub skipped: Vec<SkippedEntry>,
}

impl IndexReport {
    /// Number of indexed entries
    pub fn indexed(&self) -> usize {
        self.entries.len()
    }

    /// Skipped entries caused by read failures
    pub fn failures(&self) -> impl Iterator<Item = &SkippedEntry> {
        self.skipped.iter().filter(|s| s.reason.is_failure())
    }
}

/// Builds the search index from a catalog and a content source
pub struct Indexer<S: ContentSource> {
    catalog: Catalog,
    source: S,
    max_content_chars: usize,
}

impl<S: ContentSource> Indexer<S> {
    /// Create an indexer with the default content limit
    pub fn new(catalog: Catalog, source: S) -> Self {
        Self {
            catalog,
            source,
            max_content_chars: MAX_CONTENT_CHARS,
        }
    }

    /// Override the per-entry content limit (in characters)
    pub fn with_max_content_chars(mut self, max: usize) -> Self {
        self.max_content_chars = max;
        self
    }

    /// Build the index entries
    #[instrument(skip(self), fields(source = self.source.name(), catalog_entries = self.catalog.len()))]
    pub async fn build(&self) -> IndexReport {
        let mut report = IndexReport::default();
        let mut seen = HashSet::new();

        for (category, entry) in self.catalog.entries() {
            if !seen.insert(entry.path.as_str()) {
                debug!(path = %entry.path, category, "Duplicate catalog path, skipping");
                report.skipped.push(SkippedEntry {
                    category: category.to_string(),
                    path: entry.path.clone(),
                    reason: SkipReason::DuplicatePath,
                });
                continue;
            }

            match self.source.fetch(&entry.path).await {
                Ok(text) => {
                    report.entries.push(IndexEntry {
                        title: entry.name.clone(),
                        category: category.to_string(),
                        path: entry.path.clone(),
                        content: clean_for_index(&text, self.max_content_chars),
                    });
                }
                Err(e) => {
                    match &e {
                        ContentError::Io { .. } => {
                            warn!(path = %entry.path, error = %e, "Failed to read artifact, skipping")
                        }
                        _ => debug!(path = %entry.path, reason = %e, "Artifact not indexable, skipping"),
                    }
                    report.skipped.push(SkippedEntry {
                        category: category.to_string(),
                        path: entry.path.clone(),
                        reason: SkipReason::Content(e),
                    });
                }
            }
        }

        info!(
            indexed = report.indexed(),
            skipped = report.skipped.len(),
            "Search index built"
        );

        report
    }
}

/// Serialize entries as a pretty JSON array and replace `path` atomically
pub async fn write_index(entries: &[IndexEntry], path: &Path) -> Result<(), IndexError> {
    let json = serde_json::to_string_pretty(entries)?;

    write_atomic(path, json.as_bytes())
        .await
        .map_err(|source| IndexError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    info!(path = %path.display(), entries = entries.len(), "Search index written");
    Ok(())
}
