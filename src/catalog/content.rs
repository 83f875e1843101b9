//! Content storage for catalog artifacts.
//!
//! Resolves catalog paths under a content root and reads them as text.
//! Only files with a recognized text extension are served.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::fs;

/// Extensions served by default (markdown, plain text, shell script)
pub const DEFAULT_EXTENSIONS: &[&str] = &["md", "txt", "sh"];

/// Reasons an artifact could not be served
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("artifact not found: {0}")]
    Missing(String),

    #[error("unsupported extension: {0}")]
    UnsupportedExtension(String),

    #[error("path escapes the content root: {0}")]
    OutsideRoot(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Source of artifact text, addressed by catalog path
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Human-readable source name
    fn name(&self) -> &str;

    /// Fetch the text of an artifact
    async fn fetch(&self, relative_path: &str) -> Result<String, ContentError>;
}

/// File-system backed content store
#[derive(Debug, Clone)]
pub struct FsContentStore {
    root: PathBuf,
    extensions: Vec<String>,
}

impl FsContentStore {
    /// Create a store rooted at `root` with the default extension allow-list
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Replace the extension allow-list
    pub fn with_extensions(mut self, extensions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extensions = extensions
            .into_iter()
            .map(|e| {
                let ext: String = e.into();
                ext.trim_start_matches('.').to_string()
            })
            .collect();
        self
    }

    /// Content root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a catalog path under the root
    pub fn resolve(&self, relative_path: &str) -> Result<PathBuf, ContentError> {
        let relative = Path::new(relative_path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));

        if escapes {
            return Err(ContentError::OutsideRoot(relative_path.to_string()));
        }

        Ok(self.root.join(relative))
    }

    /// Check whether a path carries a recognized extension
    pub fn is_recognized(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.iter().any(|allowed| allowed == ext))
            .unwrap_or(false)
    }

    /// Check whether an artifact exists and would be served
    pub async fn is_available(&self, relative_path: &str) -> bool {
        match self.resolve(relative_path) {
            Ok(path) => self.is_recognized(&path) && fs::metadata(&path).await.is_ok(),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl ContentSource for FsContentStore {
    fn name(&self) -> &str {
        "filesystem"
    }

    async fn fetch(&self, relative_path: &str) -> Result<String, ContentError> {
        let path = self.resolve(relative_path)?;

        match fs::metadata(&path).await {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ContentError::Missing(relative_path.to_string()));
            }
            Err(source) => {
                return Err(ContentError::Io {
                    path: relative_path.to_string(),
                    source,
                });
            }
        }

        if !self.is_recognized(&path) {
            return Err(ContentError::UnsupportedExtension(relative_path.to_string()));
        }

        fs::read_to_string(&path)
            .await
            .map_err(|source| ContentError::Io {
                path: relative_path.to_string(),
                source,
            })
    }
}
