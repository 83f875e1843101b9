//! Search Index Integration Tests
//!
//! Builds indexes from on-disk catalogs and content roots.

use doccat::catalog::{Catalog, CatalogEntry, ContentError, FsContentStore};
use doccat::core::{write_index, Indexer, SkipReason};
use doccat::domain::{IndexEntry, SearchIndex};
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

#[tokio::test]
async fn test_end_to_end_readme() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "README.md", "# Title\nSome *text* here.");
    write(
        temp.path(),
        "doc_registry.json",
        r#"{"general": [{"name":"Readme","path":"README.md"}]}"#,
    );

    let catalog = Catalog::from_file(&temp.path().join("doc_registry.json")).unwrap();
    let report = Indexer::new(catalog, FsContentStore::new(temp.path()))
        .build()
        .await;

    let output = temp.path().join("search_index.json");
    write_index(&report.entries, &output).await.unwrap();

    let index = SearchIndex::load(&output).await.unwrap();
    assert_eq!(
        index.entries,
        vec![IndexEntry {
            title: "Readme".to_string(),
            category: "general".to_string(),
            path: "README.md".to_string(),
            content: "Title Some text here.".to_string(),
        }]
    );

    // Pretty-printed JSON array
    let raw = std::fs::read_to_string(&output).unwrap();
    assert!(raw.starts_with("[\n"));
}

#[tokio::test]
async fn test_missing_and_unsupported_artifacts_are_omitted() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "skills/build.md", "Build *things*");
    write(temp.path(), "scripts/setup.sh", "#!/bin/sh\necho setup");
    write(temp.path(), "notes.txt", "plain notes");
    write(temp.path(), "diagram.svg", "<svg/>");

    let catalog = Catalog::new()
        .with_category(
            "skills",
            [
                CatalogEntry::new("Build", "skills/build.md"),
                CatalogEntry::new("Deploy", "skills/deploy.md"),
            ],
        )
        .with_category(
            "misc",
            [
                CatalogEntry::new("Setup", "scripts/setup.sh"),
                CatalogEntry::new("Diagram", "diagram.svg"),
                CatalogEntry::new("Notes", "notes.txt"),
                CatalogEntry::new("Escape", "../outside.md"),
            ],
        );

    let report = Indexer::new(catalog, FsContentStore::new(temp.path()))
        .build()
        .await;

    let paths: Vec<_> = report.entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["skills/build.md", "scripts/setup.sh", "notes.txt"]);
    assert_eq!(report.entries[1].content, "!/bin/sh echo setup");

    let skipped: Vec<_> = report.skipped.iter().map(|s| s.path.as_str()).collect();
    assert_eq!(skipped, vec!["skills/deploy.md", "diagram.svg", "../outside.md"]);
    assert!(report
        .skipped
        .iter()
        .all(|s| matches!(s.reason, SkipReason::Content(_))));
    assert_eq!(report.failures().count(), 0);
}

#[tokio::test]
async fn test_unreadable_artifacts_are_skipped_and_batch_continues() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "first.md", "first *page*");
    // Directory carrying a text extension
    std::fs::create_dir_all(temp.path().join("broken.md")).unwrap();
    std::fs::write(temp.path().join("binary.txt"), [0xffu8, 0xfe, 0x00, 0x80]).unwrap();
    write(temp.path(), "last.md", "last page");

    let catalog = Catalog::new().with_category(
        "docs",
        [
            CatalogEntry::new("First", "first.md"),
            CatalogEntry::new("Broken", "broken.md"),
            CatalogEntry::new("Binary", "binary.txt"),
            CatalogEntry::new("Last", "last.md"),
        ],
    );

    let report = Indexer::new(catalog, FsContentStore::new(temp.path()))
        .build()
        .await;

    let paths: Vec<_> = report.entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["first.md", "last.md"]);

    let failures: Vec<_> = report.failures().map(|s| s.path.as_str()).collect();
    assert_eq!(failures, vec!["broken.md", "binary.txt"]);
    assert!(report
        .failures()
        .all(|s| matches!(s.reason, SkipReason::Content(ContentError::Io { .. }))));
}

#[tokio::test]
async fn test_order_follows_catalog_not_filesystem() {
    let temp = TempDir::new().unwrap();
    for name in ["a.md", "b.md", "c.md"] {
        write(temp.path(), name, name);
    }

    let catalog = Catalog::from_json_str(
        r#"{
            "second": [{"name": "C", "path": "c.md"}, {"name": "A", "path": "a.md"}],
            "first": [{"name": "B", "path": "b.md"}]
        }"#,
    )
    .unwrap();

    let report = Indexer::new(catalog, FsContentStore::new(temp.path()))
        .build()
        .await;

    let titles: Vec<_> = report.entries.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["C", "A", "B"]);
    let categories: Vec<_> = report.entries.iter().map(|e| e.category.as_str()).collect();
    assert_eq!(categories, vec!["second", "second", "first"]);
}

#[tokio::test]
async fn test_content_never_exceeds_limit() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "long.md", &"# Heading\n*lorem* ipsum ".repeat(1000));
    write(temp.path(), "short.md", "short");

    let catalog = Catalog::new().with_category(
        "docs",
        [
            CatalogEntry::new("Long", "long.md"),
            CatalogEntry::new("Short", "short.md"),
        ],
    );

    let report = Indexer::new(catalog, FsContentStore::new(temp.path()))
        .build()
        .await;

    assert_eq!(report.entries[0].content.chars().count(), 5000);
    assert!(report.entries[0].content.starts_with("Heading lorem ipsum Heading"));
    assert_eq!(report.entries[1].content, "short");
}

#[tokio::test]
async fn test_rebuild_replaces_previous_index() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "a.md", "alpha");
    write(temp.path(), "b.md", "beta");
    let output = temp.path().join("out").join("search_index.json");

    let full = Catalog::new().with_category(
        "docs",
        [CatalogEntry::new("A", "a.md"), CatalogEntry::new("B", "b.md")],
    );
    let report = Indexer::new(full, FsContentStore::new(temp.path()))
        .build()
        .await;
    write_index(&report.entries, &output).await.unwrap();
    assert_eq!(SearchIndex::load(&output).await.unwrap().len(), 2);

    // Entry removed from the catalog disappears from the next build
    let reduced = Catalog::new().with_category("docs", [CatalogEntry::new("B", "b.md")]);
    let report = Indexer::new(reduced, FsContentStore::new(temp.path()))
        .build()
        .await;
    write_index(&report.entries, &output).await.unwrap();

    let index = SearchIndex::load(&output).await.unwrap();
    assert_eq!(index.len(), 1);
    assert_eq!(index.entries[0].path, "b.md");
    assert_eq!(index.search("beta").len(), 1);
}

#[tokio::test]
async fn test_write_index_fails_on_unwritable_target() {
    let temp = TempDir::new().unwrap();
    // A directory where the output file should go
    let output = temp.path().join("taken");
    std::fs::create_dir_all(output.join("child")).unwrap();

    let result = write_index(&[], &output).await;
    assert!(result.is_err());
}
