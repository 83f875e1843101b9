//! Catalog of indexable documentation.
//!
//! The catalog maps a category name to an ordered list of entries. It is
//! loaded from a JSON or YAML document and never mutated afterwards; the
//! declaration order of categories and entries is preserved because it
//! drives the order of the generated search index.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Catalog text that does not have the `category -> [entry]` shape
#[derive(Debug, Error)]
pub enum CatalogParseError {
    #[error("invalid JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors raised while loading a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse catalog {}", .path.display())]
    Parse {
        path: PathBuf,
        source: CatalogParseError,
    },
}

/// A single catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Human-readable display name
    pub name: String,

    /// Path relative to the content root
    pub path: String,
}

impl CatalogEntry {
    /// Create a new catalog entry
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// A named group of entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub entries: Vec<CatalogEntry>,
}

/// Ordered mapping of category to entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a category, keeping declaration order
    pub fn with_category(
        mut self,
        name: impl Into<String>,
        entries: impl IntoIterator<Item = CatalogEntry>,
    ) -> Self {
        self.push_category(name.into(), entries.into_iter().collect());
        self
    }

    fn push_category(&mut self, name: String, entries: Vec<CatalogEntry>) {
        // A repeated key extends the first declaration rather than reordering it
        if let Some(existing) = self.categories.iter_mut().find(|c| c.name == name) {
            existing.entries.extend(entries);
        } else {
            self.categories.push(Category { name, entries });
        }
    }

    /// Load a catalog from disk, choosing the parser by file extension
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let parsed = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            _ => Self::from_json_str(&content),
        };

        parsed.map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a catalog from JSON text
    pub fn from_json_str(content: &str) -> Result<Self, CatalogParseError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parse a catalog from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self, CatalogParseError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Categories in declaration order
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Entries of a single category
    pub fn get(&self, category: &str) -> Option<&[CatalogEntry]> {
        self.categories
            .iter()
            .find(|c| c.name == category)
            .map(|c| c.entries.as_slice())
    }

    /// All `(category, entry)` pairs in declaration order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &CatalogEntry)> {
        self.categories
            .iter()
            .flat_map(|c| c.entries.iter().map(move |e| (c.name.as_str(), e)))
    }

    /// Paths referenced by more than one entry, in first-seen order
    pub fn duplicate_paths(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();

        for (_, entry) in self.entries() {
            if !seen.insert(entry.path.as_str()) && !duplicates.contains(&entry.path.as_str()) {
                duplicates.push(entry.path.as_str());
            }
        }

        duplicates
    }

    /// Total number of entries
    pub fn len(&self) -> usize {
        self.categories.iter().map(|c| c.entries.len()).sum()
    }

    /// Check if the catalog has no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for category in &self.categories {
            map.serialize_entry(&category.name, &category.entries)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = Catalog;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of category name to a list of {name, path} entries")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Catalog, A::Error> {
                let mut catalog = Catalog::new();
                while let Some((name, entries)) =
                    access.next_entry::<String, Vec<CatalogEntry>>()?
                {
                    catalog.push_category(name, entries);
                }
                Ok(catalog)
            }
        }

        deserializer.deserialize_map(CatalogVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGISTRY: &str = r#"{
        "skills": [
            { "name": "Mermaid Diagrams", "path": "skills/mermaid.md" },
            { "name": "Build Skill", "path": "skills/build.md" }
        ],
        "build_plane": [
            { "name": "Build Plane Readme", "path": "build_plane/readme.md" }
        ],
        "general": [
            { "name": "Project Readme", "path": "README.md" }
        ]
    }"#;

    #[test]
    fn test_json_preserves_declaration_order() {
        let catalog = Catalog::from_json_str(REGISTRY).unwrap();

        let names: Vec<_> = catalog.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["skills", "build_plane", "general"]);

        let paths: Vec<_> = catalog.entries().map(|(_, e)| e.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "skills/mermaid.md",
                "skills/build.md",
                "build_plane/readme.md",
                "README.md"
            ]
        );
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_yaml_catalog() {
        let yaml = r#"
zeta:
  - { name: "Last", path: "z.md" }
alpha:
  - name: First
    path: a.txt
"#;
        let catalog = Catalog::from_yaml_str(yaml).unwrap();

        let names: Vec<_> = catalog.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert_eq!(
            catalog.get("alpha").unwrap(),
            &[CatalogEntry::new("First", "a.txt")]
        );
    }

    #[test]
    fn test_serialize_round_trip_keeps_order() {
        let catalog = Catalog::from_json_str(REGISTRY).unwrap();
        let json = serde_json::to_string(&catalog).unwrap();

        assert!(json.find("skills").unwrap() < json.find("build_plane").unwrap());
        assert_eq!(Catalog::from_json_str(&json).unwrap(), catalog);
    }

    #[test]
    fn test_duplicate_paths() {
        let catalog = Catalog::new()
            .with_category("a", [CatalogEntry::new("One", "x.md")])
            .with_category(
                "b",
                [CatalogEntry::new("Two", "x.md"), CatalogEntry::new("Three", "y.md")],
            );

        assert_eq!(catalog.duplicate_paths(), vec!["x.md"]);
    }

    #[test]
    fn test_invalid_catalog_is_rejected() {
        assert!(matches!(
            Catalog::from_json_str(r#"{"general": "README.md"}"#),
            Err(CatalogParseError::Json(_))
        ));
        assert!(Catalog::from_json_str("[]").is_err());
        assert!(matches!(
            Catalog::from_yaml_str("general: [unclosed"),
            Err(CatalogParseError::Yaml(_))
        ));
    }

    #[test]
    fn test_parse_error_keeps_path_and_cause() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("registry.yaml");
        std::fs::write(&path, "- not\n- a map\n").unwrap();

        let err = Catalog::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("registry.yaml"));
        assert!(matches!(
            err,
            CatalogError::Parse {
                source: CatalogParseError::Yaml(_),
                ..
            }
        ));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = Catalog::from_file(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }
}
