//! Command-line interface for doccat.
//!
//! Provides commands for building the search index, converting raw agent
//! records, searching the index and inspecting the catalog.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::error;

use crate::adapters::ApiClient;
use crate::catalog::{Catalog, FsContentStore};
use crate::config::{load_config, ResolvedConfig};
use crate::core::{write_index, Indexer, NormalizeError, Normalizer};
use crate::domain::SearchIndex;

/// doccat - documentation catalog tooling
#[derive(Parser, Debug)]
#[command(name = "doccat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (defaults to .doccat/config.yaml discovery)
    #[arg(long, global = true, env = "DOCCAT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the search index from the catalog
    Index {
        /// Catalog file (JSON or YAML)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Directory catalog paths are relative to
        #[arg(long)]
        content_root: Option<PathBuf>,

        /// Output file for the index
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert raw agent records into normalized markdown
    Convert {
        /// Directory holding the raw records
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Print normalized records instead of converting them
        #[arg(long)]
        dry_run: bool,
    },

    /// Search the generated index
    Search {
        /// Search query
        query: String,

        /// Index file to search
        #[arg(long)]
        index: Option<PathBuf>,

        /// Maximum number of results to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// List catalog entries and whether their artifacts are available
    Catalog {
        /// Catalog file (JSON or YAML)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Show resolved configuration (debug)
    Config,

    /// Query the documentation server version
    RemoteVersion {
        /// Server base URL
        #[arg(long)]
        url: Option<String>,
    },
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let config = load_config(self.config.as_deref())?;

        match self.command {
            Commands::Index {
                catalog,
                content_root,
                output,
            } => build_index(&config, catalog, content_root, output).await,
            Commands::Convert { dir, dry_run } => convert_records(&config, dir, dry_run).await,
            Commands::Search {
                query,
                index,
                limit,
            } => search_index(&config, &query, index, limit).await,
            Commands::Catalog { catalog } => list_catalog(&config, catalog).await,
            Commands::Config => show_config(&config),
            Commands::RemoteVersion { url } => remote_version(&config, url).await,
        }
    }
}

fn load_catalog(path: &Path) -> Result<Catalog> {
    Catalog::from_file(path).context("Catalog configuration is unusable")
}

fn content_store(config: &ResolvedConfig, root: PathBuf) -> FsContentStore {
    FsContentStore::new(root).with_extensions(config.indexer.extensions.iter().cloned())
}

/// Build and write the search index
async fn build_index(
    config: &ResolvedConfig,
    catalog: Option<PathBuf>,
    content_root: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let catalog_path = catalog.unwrap_or_else(|| config.catalog.clone());
    let root = content_root.unwrap_or_else(|| config.content_root.clone());
    let output = output.unwrap_or_else(|| config.index.clone());

    let catalog = load_catalog(&catalog_path)?;
    println!("Building search index...");

    let indexer = Indexer::new(catalog, content_store(config, root))
        .with_max_content_chars(config.indexer.max_content_chars);
    let report = indexer.build().await;

    for skipped in report.failures() {
        eprintln!("Error processing {}: {}", skipped.path, skipped.reason);
    }

    write_index(&report.entries, &output).await?;

    println!(
        "Search index generated at {} containing {} items.",
        output.display(),
        report.indexed()
    );
    if !report.skipped.is_empty() {
        println!("Skipped {} catalog entries.", report.skipped.len());
    }

    Ok(())
}

/// Convert all raw records in the record directory
async fn convert_records(config: &ResolvedConfig, dir: Option<PathBuf>, dry_run: bool) -> Result<()> {
    let dir = dir.unwrap_or_else(|| config.records.clone());
    let settings = &config.normalizer;

    let normalizer = Normalizer::new(dir)
        .with_source_extension(settings.source_extension.as_str())
        .with_target_extension(settings.target_extension.as_str())
        .with_record_type(settings.record_type.as_str());

    let pending = normalizer.pending()?;
    println!(
        "Found {} {} files to convert in {}.",
        pending.len(),
        settings.source_extension,
        normalizer.dir().display()
    );

    if dry_run {
        for path in &pending {
            let record = normalizer.render_file(path).await?;
            println!("==> {} -> {}", path.display(), normalizer.target_for(path).display());
            print!("{record}");
        }
        return Ok(());
    }

    match normalizer.convert_all().await {
        Ok(report) => {
            println!("Converted {} records.", report.len());
            Ok(())
        }
        Err(failure) => {
            if matches!(failure.error, NormalizeError::SourceRemoval { .. }) {
                error!(error = %failure.error, "Conversion stopped with source and target both on disk");
            }
            println!("Converted {} records before stopping.", failure.report.len());
            Err(failure.into())
        }
    }
}

/// Search the index
async fn search_index(
    config: &ResolvedConfig,
    query: &str,
    index: Option<PathBuf>,
    limit: usize,
) -> Result<()> {
    let index_path = index.unwrap_or_else(|| config.index.clone());
    let index = SearchIndex::load(&index_path).await?;

    let results = index.search(query);

    if results.is_empty() {
        println!("No results for '{}'", query);
        return Ok(());
    }

    println!("{:<30} {:<15} {:<40}", "TITLE", "CATEGORY", "PATH");
    println!("{}", "-".repeat(85));

    for entry in results.iter().take(limit) {
        println!("{:<30} {:<15} {:<40}", entry.title, entry.category, entry.path);
    }

    if results.len() > limit {
        println!("... and {} more", results.len() - limit);
    }

    Ok(())
}

/// List catalog entries with availability
async fn list_catalog(config: &ResolvedConfig, catalog: Option<PathBuf>) -> Result<()> {
    let catalog_path = catalog.unwrap_or_else(|| config.catalog.clone());
    let catalog = load_catalog(&catalog_path)?;
    let store = content_store(config, config.content_root.clone());

    for category in catalog.categories() {
        println!("{} ({})", category.name, category.entries.len());
        for entry in &category.entries {
            let marker = if store.is_available(&entry.path).await {
                " "
            } else {
                "!"
            };
            println!("  {} {:<30} {}", marker, entry.name, entry.path);
        }
    }

    for path in catalog.duplicate_paths() {
        println!("warning: {} is listed more than once", path);
    }

    Ok(())
}

/// Print the resolved configuration
fn show_config(config: &ResolvedConfig) -> Result<()> {
    match &config.config_file {
        Some(path) => println!("Config file:   {}", path.display()),
        None => println!("Config file:   (none, using defaults)"),
    }
    println!("Content root:  {}", config.content_root.display());
    println!("Catalog:       {}", config.catalog.display());
    println!("Index:         {}", config.index.display());
    println!("Records:       {}", config.records.display());
    println!(
        "Indexer:       max {} chars, extensions [{}]",
        config.indexer.max_content_chars,
        config.indexer.extensions.join(", ")
    );
    println!(
        "Normalizer:    *.{} -> *.{} (type: {})",
        config.normalizer.source_extension,
        config.normalizer.target_extension,
        config.normalizer.record_type
    );
    println!(
        "API:           {}{}",
        config.api_url.as_deref().unwrap_or("(not configured)"),
        if config.api_token.is_some() { " [token set]" } else { "" }
    );

    Ok(())
}

/// Query the server version endpoint
async fn remote_version(config: &ResolvedConfig, url: Option<String>) -> Result<()> {
    let base_url = url
        .or_else(|| config.api_url.clone())
        .context("No API URL configured. Use --url or set DOCCAT_API_URL")?;

    let mut client = ApiClient::new(base_url)
        .on_unauthorized(|path| eprintln!("Authentication required for {path}. Set DOCCAT_TOKEN."));
    if let Some(token) = &config.api_token {
        client = client.with_token(token.clone());
    }

    let info = client.version().await?;
    println!("{info}");

    Ok(())
}
