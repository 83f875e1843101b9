//! Core transformation logic.
//!
//! This module contains:
//! - Text: markup stripping and truncation for index content
//! - Indexer: catalog + content source → search index
//! - Record: line scanner for raw agent records
//! - Normalizer: convert-and-replace of raw records into markdown

pub mod indexer;
pub mod normalizer;
pub mod record;
pub mod text;

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;

// Re-export commonly used types
pub use indexer::{write_index, IndexError, IndexReport, Indexer, SkipReason, SkippedEntry};
pub use normalizer::{
    ConversionFailure, ConversionReport, ConvertedRecord, FsRecordStore, NormalizeError, Normalizer,
    RecordStore,
};
pub use record::{scan_record, FieldKey, ScannedRecord};
pub use text::{clean_for_index, strip_markup, truncate_chars, MAX_CONTENT_CHARS};

/// Temporary sibling used while replacing `path`
pub(crate) fn temp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    path.with_file_name(format!(".{file_name}.tmp"))
}

/// Replace `path` with `contents`: write a temp sibling, then rename over it.
pub(crate) async fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    let temp = temp_path(path);
    fs::write(&temp, contents).await?;

    if let Err(e) = fs::rename(&temp, path).await {
        let _ = fs::remove_file(&temp).await;
        return Err(e);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_temp_path_is_hidden_sibling() {
        assert_eq!(
            temp_path(Path::new("/data/search_index.json")),
            PathBuf::from("/data/.search_index.json.tmp")
        );
    }

    #[tokio::test]
    async fn test_write_atomic_replaces_content() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("nested").join("out.json");

        write_atomic(&target, b"first").await.unwrap();
        write_atomic(&target, b"second").await.unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "second");
        assert!(!temp_path(&target).exists());
    }
}
