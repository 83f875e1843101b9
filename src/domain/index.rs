//! Search index entries and the index artifact.
//!
//! The index artifact is a pretty-printed JSON array of entries. It is
//! rebuilt from scratch on every run and replaced as a whole.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

/// One searchable record derived from a catalog artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Display name from the catalog
    pub title: String,

    /// Catalog category
    pub category: String,

    /// Catalog path, relative to the content root
    pub path: String,

    /// Cleaned, truncated artifact text
    pub content: String,
}

/// Loaded search index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchIndex {
    pub entries: Vec<IndexEntry>,
}

impl SearchIndex {
    pub fn new(entries: Vec<IndexEntry>) -> Self {
        Self { entries }
    }

    /// Load an index artifact from disk
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read search index: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse search index: {}", path.display()))
    }

    /// Search entries (case-insensitive substring match), in index order
    pub fn search(&self, query: &str) -> Vec<&IndexEntry> {
        let query_lower = query.to_lowercase();

        self.entries
            .iter()
            .filter(|entry| {
                entry.title.to_lowercase().contains(&query_lower)
                    || entry.category.to_lowercase().contains(&query_lower)
                    || entry.path.to_lowercase().contains(&query_lower)
                    || entry.content.to_lowercase().contains(&query_lower)
            })
            .collect()
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, category: &str, path: &str, content: &str) -> IndexEntry {
        IndexEntry {
            title: title.to_string(),
            category: category.to_string(),
            path: path.to_string(),
            content: content.to_string(),
        }
    }

    fn sample() -> SearchIndex {
        SearchIndex::new(vec![
            entry("Build Skill", "skills", "skills/build.md", "Build container images"),
            entry("Runtime Info", "runtime", "runtime/runtime.md", "Kubernetes runtime"),
            entry("Project Readme", "general", "README.md", "Overview of the project"),
        ])
    }

    #[test]
    fn test_search_matches_all_fields() {
        let index = sample();

        assert_eq!(index.search("build").len(), 1);
        assert_eq!(index.search("KUBERNETES").len(), 1);
        assert_eq!(index.search("runtime/").len(), 1);
        assert_eq!(index.search("general").len(), 1);
        assert!(index.search("python").is_empty());
    }

    #[test]
    fn test_search_keeps_index_order() {
        let index = sample();
        let titles: Vec<_> = index.search("e").iter().map(|e| e.title.as_str()).collect();

        assert_eq!(titles, vec!["Build Skill", "Runtime Info", "Project Readme"]);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let index = sample();
        let json = serde_json::to_value(&index).unwrap();

        assert!(json.is_array());
        assert_eq!(json[0]["title"], "Build Skill");
        assert_eq!(json[0]["category"], "skills");
    }
}
