//! Convert raw agent records into normalized markdown documents.
//!
//! Each `<stem>.yaml` in the record directory becomes `<stem>.md` next to
//! it, and the source is removed. The target is written to a temporary
//! sibling, read back, renamed into place, and only then is the source
//! deleted, so an interrupted run leaves either the untouched source or a
//! complete target (plus the source if deletion itself failed).

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

use super::record::scan_record;
use super::temp_path;
use crate::domain::{NormalizedRecord, DEFAULT_RECORD_TYPE};

/// Extension of raw records
pub const DEFAULT_SOURCE_EXTENSION: &str = "yaml";

/// Extension of normalized records
pub const DEFAULT_TARGET_EXTENSION: &str = "md";

/// Errors that stop a conversion run
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Record directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("Source and target extension are both '{0}'; converting would replace every record with itself")]
    SameExtension(String),

    #[error("Invalid record pattern: {0}")]
    Pattern(String),

    #[error("Failed to read record {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to write normalized record {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("Normalized record {} did not read back as written", .path.display())]
    Verify { path: PathBuf },

    #[error(
        "Wrote {} but failed to remove source {}: {error}; both files now exist",
        .target.display(),
        .source_path.display()
    )]
    SourceRemoval {
        source_path: PathBuf,
        target: PathBuf,
        error: io::Error,
    },
}

/// A completed conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedRecord {
    pub source: PathBuf,
    pub target: PathBuf,
}

/// Outcome of a conversion run
#[derive(Debug, Default)]
pub struct ConversionReport {
    pub converted: Vec<ConvertedRecord>,
}

impl ConversionReport {
    pub fn len(&self) -> usize {
        self.converted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converted.is_empty()
    }
}

/// A run that stopped early, with the records committed before the failure
#[derive(Debug, Error)]
#[error("{error} ({} records converted before the failure)", .report.len())]
pub struct ConversionFailure {
    pub report: ConversionReport,
    pub error: NormalizeError,
}

/// File operations a conversion performs
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn read(&self, path: &Path) -> io::Result<String>;

    async fn write(&self, path: &Path, contents: &str) -> io::Result<()>;

    async fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    async fn remove(&self, path: &Path) -> io::Result<()>;
}

/// Record store backed by the local file system
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRecordStore;

#[async_trait]
impl RecordStore for FsRecordStore {
    async fn read(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path).await
    }

    async fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        fs::write(path, contents).await
    }

    async fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to).await
    }

    async fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path).await
    }
}

/// Normalize raw record text
pub fn normalize(text: &str, record_type: &str) -> NormalizedRecord {
    scan_record(text).into_normalized(record_type)
}

/// Batch converter over a record directory
#[derive(Debug, Clone)]
pub struct Normalizer<S = FsRecordStore> {
    dir: PathBuf,
    source_extension: String,
    target_extension: String,
    record_type: String,
    store: S,
}

impl Normalizer {
    /// Create a normalizer for `dir` with default extensions and type tag
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            target_extension: DEFAULT_TARGET_EXTENSION.to_string(),
            record_type: DEFAULT_RECORD_TYPE.to_string(),
            store: FsRecordStore,
        }
    }
}

impl<S: RecordStore> Normalizer<S> {
    pub fn with_source_extension(mut self, ext: impl Into<String>) -> Self {
        let ext: String = ext.into();
        self.source_extension = ext.trim_start_matches('.').to_string();
        self
    }

    pub fn with_target_extension(mut self, ext: impl Into<String>) -> Self {
        let ext: String = ext.into();
        self.target_extension = ext.trim_start_matches('.').to_string();
        self
    }

    pub fn with_record_type(mut self, record_type: impl Into<String>) -> Self {
        self.record_type = record_type.into();
        self
    }

    /// Swap the file operations used for conversion
    pub fn with_store<T: RecordStore>(self, store: T) -> Normalizer<T> {
        Normalizer {
            dir: self.dir,
            source_extension: self.source_extension,
            target_extension: self.target_extension,
            record_type: self.record_type,
            store,
        }
    }

    /// Record directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn check_extensions(&self) -> Result<(), NormalizeError> {
        if self.source_extension == self.target_extension {
            return Err(NormalizeError::SameExtension(self.source_extension.clone()));
        }
        Ok(())
    }

    /// Raw records waiting for conversion, in lexical order
    pub fn pending(&self) -> Result<Vec<PathBuf>, NormalizeError> {
        self.check_extensions()?;

        if !self.dir.is_dir() {
            return Err(NormalizeError::MissingDirectory(self.dir.clone()));
        }

        let pattern = format!(
            "{}/*.{}",
            glob::Pattern::escape(&self.dir.to_string_lossy()),
            glob::Pattern::escape(&self.source_extension)
        );

        let paths = glob::glob(&pattern).map_err(|e| NormalizeError::Pattern(e.to_string()))?;

        let mut records = Vec::new();
        for entry in paths {
            match entry {
                Ok(path) if path.is_file() => records.push(path),
                Ok(_) => {}
                Err(e) => {
                    return Err(NormalizeError::Read {
                        path: e.path().to_path_buf(),
                        source: e.into_error(),
                    })
                }
            }
        }

        Ok(records)
    }

    /// Path of the normalized sibling for a raw record
    pub fn target_for(&self, source: &Path) -> PathBuf {
        source.with_extension(&self.target_extension)
    }

    /// Read and normalize one record without touching the file system
    pub async fn render_file(&self, path: &Path) -> Result<NormalizedRecord, NormalizeError> {
        let text = self
            .store
            .read(path)
            .await
            .map_err(|source| NormalizeError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let scanned = scan_record(&text);
        if scanned.body.is_none() {
            warn!(path = %path.display(), "Record has no instructions block, body will be empty");
        }

        Ok(scanned.into_normalized(&self.record_type))
    }

    /// Convert one record and remove its source
    #[instrument(skip(self), fields(source = %path.display()))]
    pub async fn convert_file(&self, path: &Path) -> Result<ConvertedRecord, NormalizeError> {
        let target = self.target_for(path);
        if target == path {
            return Err(NormalizeError::SameExtension(self.target_extension.clone()));
        }

        let rendered = self.render_file(path).await?.render();
        let temp = temp_path(&target);

        let write_err = |source| NormalizeError::Write {
            path: target.clone(),
            source,
        };

        self.store.write(&temp, &rendered).await.map_err(write_err)?;

        let written = self.store.read(&temp).await.map_err(write_err)?;
        if written != rendered {
            let _ = self.store.remove(&temp).await;
            return Err(NormalizeError::Verify { path: target });
        }

        if let Err(e) = self.store.rename(&temp, &target).await {
            let _ = self.store.remove(&temp).await;
            return Err(write_err(e));
        }
        debug!(output = %target.display(), "Normalized record committed");

        self.store
            .remove(path)
            .await
            .map_err(|error| NormalizeError::SourceRemoval {
                source_path: path.to_path_buf(),
                target: target.clone(),
                error,
            })?;

        Ok(ConvertedRecord {
            source: path.to_path_buf(),
            target,
        })
    }

    /// Convert every pending record; the first failure stops the run
    pub async fn convert_all(&self) -> Result<ConversionReport, ConversionFailure> {
        let mut report = ConversionReport::default();

        let pending = match self.pending() {
            Ok(pending) => pending,
            Err(error) => return Err(ConversionFailure { report, error }),
        };
        info!(dir = %self.dir.display(), count = pending.len(), "Converting records");

        for path in pending {
            match self.convert_file(&path).await {
                Ok(converted) => {
                    info!(
                        "Converted {} -> {}",
                        file_name(&converted.source),
                        file_name(&converted.target)
                    );
                    report.converted.push(converted);
                }
                Err(error) => return Err(ConversionFailure { report, error }),
            }
        }

        Ok(report)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
