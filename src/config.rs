//! Configuration for doccat.
//!
//! Configuration sources (highest priority first):
//! 1. Command-line flags (applied by the CLI)
//! 2. Environment variables (DOCCAT_CONTENT_ROOT, DOCCAT_CATALOG, ...)
//! 3. Config file (.doccat/config.yaml)
//! 4. Defaults (relative to the current directory)
//!
//! Config file discovery:
//! - An explicit path (`--config`) wins
//! - Otherwise searches current directory and parents for .doccat/config.yaml
//! - Then falls back to the user config directory (doccat/config.yaml)
//! - Paths in config file are relative to the project root (parent of .doccat/)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::catalog::DEFAULT_EXTENSIONS;
use crate::core::normalizer::{DEFAULT_SOURCE_EXTENSION, DEFAULT_TARGET_EXTENSION};
use crate::core::MAX_CONTENT_CHARS;
use crate::domain::DEFAULT_RECORD_TYPE;

/// Default catalog file name
pub const DEFAULT_CATALOG: &str = "doc_registry.json";

/// Default index artifact file name
pub const DEFAULT_INDEX: &str = "search_index.json";

/// Default raw record directory
pub const DEFAULT_RECORDS: &str = "agents";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub indexer: Option<IndexerConfig>,
    #[serde(default)]
    pub normalizer: Option<NormalizerConfig>,
    #[serde(default)]
    pub api: Option<ApiConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Directory catalog paths are relative to
    pub content_root: Option<String>,
    /// Catalog file (JSON or YAML)
    pub catalog: Option<String>,
    /// Search index output file
    pub index: Option<String>,
    /// Directory of raw agent records
    pub records: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexerConfig {
    pub max_content_chars: Option<usize>,
    pub extensions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NormalizerConfig {
    pub source_extension: Option<String>,
    pub target_extension: Option<String>,
    pub record_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Directory catalog paths are relative to
    pub content_root: PathBuf,
    /// Catalog file
    pub catalog: PathBuf,
    /// Search index output file
    pub index: PathBuf,
    /// Raw record directory
    pub records: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// Indexer settings
    pub indexer: IndexerSettings,
    /// Normalizer settings
    pub normalizer: NormalizerSettings,
    /// API base URL, if configured
    pub api_url: Option<String>,
    /// API bearer token (environment only)
    pub api_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexerSettings {
    pub max_content_chars: usize,
    pub extensions: Vec<String>,
}

impl Default for IndexerSettings {
    fn default() -> Self {
        Self {
            max_content_chars: MAX_CONTENT_CHARS,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizerSettings {
    pub source_extension: String,
    pub target_extension: String,
    pub record_type: String,
}

impl Default for NormalizerSettings {
    fn default() -> Self {
        Self {
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            target_extension: DEFAULT_TARGET_EXTENSION.to_string(),
            record_type: DEFAULT_RECORD_TYPE.to_string(),
        }
    }
}

/// Find config file by searching `start` and its parents
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(".doccat").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    let user_config = dirs::config_dir()?.join("doccat").join("config.yaml");
    user_config.exists().then_some(user_config)
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to `base`
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Project root for a config file: the parent of `.doccat/`
fn project_root(config_path: &Path) -> PathBuf {
    let dir = config_path.parent().unwrap_or(Path::new("."));

    if dir.file_name().map(|n| n == ".doccat").unwrap_or(false) {
        dir.parent().unwrap_or(Path::new(".")).to_path_buf()
    } else {
        dir.to_path_buf()
    }
}

/// Pick env var, then config value, then default, resolving against `base`
fn layered_path(env_key: &str, file_value: Option<&String>, default: &str, base: &Path) -> PathBuf {
    if let Ok(value) = std::env::var(env_key) {
        return PathBuf::from(value);
    }

    resolve_path(base, file_value.map(String::as_str).unwrap_or(default))
}

/// Load configuration from all sources
pub fn load_config(explicit: Option<&Path>) -> Result<ResolvedConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;

    let config_file = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => find_config_file(&cwd),
    };

    let (file, base) = match &config_file {
        Some(path) => (Some(load_config_file(path)?), project_root(path)),
        None => (None, cwd),
    };

    let paths = file.as_ref().map(|f| f.paths.clone()).unwrap_or_default();

    let content_root = layered_path("DOCCAT_CONTENT_ROOT", paths.content_root.as_ref(), ".", &base);
    let catalog = layered_path("DOCCAT_CATALOG", paths.catalog.as_ref(), DEFAULT_CATALOG, &base);
    let index = layered_path("DOCCAT_INDEX", paths.index.as_ref(), DEFAULT_INDEX, &base);
    let records = layered_path("DOCCAT_RECORDS", paths.records.as_ref(), DEFAULT_RECORDS, &base);

    let indexer_file = file.as_ref().and_then(|f| f.indexer.clone());
    let defaults = IndexerSettings::default();
    let indexer = IndexerSettings {
        max_content_chars: indexer_file
            .as_ref()
            .and_then(|i| i.max_content_chars)
            .unwrap_or(defaults.max_content_chars),
        extensions: indexer_file
            .and_then(|i| i.extensions)
            .unwrap_or(defaults.extensions),
    };

    let normalizer_file = file.as_ref().and_then(|f| f.normalizer.clone());
    let defaults = NormalizerSettings::default();
    let normalizer = match normalizer_file {
        Some(n) => NormalizerSettings {
            source_extension: n.source_extension.unwrap_or(defaults.source_extension),
            target_extension: n.target_extension.unwrap_or(defaults.target_extension),
            record_type: n.record_type.unwrap_or(defaults.record_type),
        },
        None => defaults,
    };

    let api_url = std::env::var("DOCCAT_API_URL").ok().or_else(|| {
        file.as_ref()
            .and_then(|f| f.api.as_ref())
            .and_then(|a| a.base_url.clone())
    });
    let api_token = std::env::var("DOCCAT_TOKEN").ok().filter(|t| !t.is_empty());

    Ok(ResolvedConfig {
        content_root,
        catalog,
        index,
        records,
        config_file,
        indexer,
        normalizer,
        api_url,
        api_token,
    })
}
