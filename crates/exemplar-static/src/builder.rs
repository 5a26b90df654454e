//! Static site builder.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde_json::Value;

use exemplar_core::{
    collect_examples, AugmentError, AugmentOptions, IndexError, IndexOptions, DEFAULT_API_ROOT,
    INDEX_PAGE, INDEX_SCRIPT,
};
use exemplar_source::{FileStore, Metadata, SourceError};

use crate::pipeline::{AugmentStage, IndexStage, Pipeline, TemplateStage};
use crate::templates::TemplateEngine;

/// Configuration for building the examples site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Source examples directory
    pub source_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Directory with page templates (built-in templates are used otherwise)
    pub templates_dir: Option<PathBuf>,

    /// Site title
    pub title: String,

    /// Library version shown on every page
    pub version: Option<String>,

    /// Prefix for API documentation links
    pub api_root: String,

    /// Example loader script
    pub loader: String,

    /// Listing page that is not an example itself
    pub index_page: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("examples"),
            output_dir: PathBuf::from("build/examples"),
            templates_dir: None,
            title: "Examples".to_string(),
            version: None,
            api_root: DEFAULT_API_ROOT.to_string(),
            loader: "loader.js".to_string(),
            index_page: INDEX_PAGE.to_string(),
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of files written
    pub files: usize,

    /// Number of example pages
    pub examples: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read sources: {0}")]
    ReadError(#[from] SourceError),

    #[error(transparent)]
    Augment(#[from] AugmentError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("Failed to render template for {path}: {message}")]
    TemplateError { path: String, message: String },

    #[error("Failed to write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
    pipeline: Pipeline,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig) -> Self {
        let augment = AugmentOptions {
            api_root: config.api_root.clone(),
            loader: config.loader.clone(),
            index_page: config.index_page.clone(),
        };
        let index = IndexOptions {
            index_page: config.index_page.clone(),
            output: INDEX_SCRIPT.to_string(),
        };

        let pipeline = Pipeline::new()
            .with(AugmentStage::new(augment))
            .with(IndexStage::new(index))
            .with(TemplateStage::new(
                TemplateEngine::new(config.templates_dir.clone()),
                site_metadata(&config),
            ));

        Self { config, pipeline }
    }

    /// Build the site.
    ///
    /// Nothing is written unless every stage succeeds.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        let mut store = FileStore::load(&self.config.source_dir)?;
        tracing::info!(
            "Loaded {} files from {}",
            store.len(),
            self.config.source_dir.display()
        );

        self.process(&mut store)?;

        let examples = collect_examples(&store, &self.config.index_page).len();
        let files = self.write_output(&store)?;

        let duration = start.elapsed();

        Ok(BuildResult {
            files,
            examples,
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Run all stages over an already loaded store.
    pub fn process(&self, store: &mut FileStore) -> Result<(), BuildError> {
        self.pipeline.run(store)
    }

    /// Write every record below the output directory.
    fn write_output(&self, store: &FileStore) -> Result<usize, BuildError> {
        let write_error = |path: &Path| {
            let path = path.to_path_buf();
            move |source| BuildError::WriteError { path, source }
        };

        for (relative, record) in store.iter() {
            let target = self.config.output_dir.join(relative);

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(write_error(parent))?;
            }

            fs::write(&target, &record.contents).map_err(write_error(&target))?;

            if let Some(mode) = record.mode {
                apply_mode(&target, mode).map_err(write_error(&target))?;
            }
        }

        Ok(store.len())
    }
}

/// Values every template can see.
fn site_metadata(config: &BuildConfig) -> Metadata {
    let mut site = Metadata::new();
    site.insert("site_title".to_string(), Value::String(config.title.clone()));
    if let Some(version) = &config.version {
        site.insert("version".to_string(), Value::String(version.clone()));
    }
    site
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}
