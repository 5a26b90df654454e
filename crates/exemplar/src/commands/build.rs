//! Examples build command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use exemplar_static::{BuildConfig, StaticBuilder};
use serde::Deserialize;

/// Configuration file structure (examples.toml).
#[derive(Debug, Deserialize, Default)]
pub(crate) struct ConfigFile {
    #[serde(default)]
    examples: ExamplesConfig,
    #[serde(default)]
    links: LinksConfig,
}

#[derive(Debug, Deserialize)]
struct ExamplesConfig {
    #[serde(default = "default_dir")]
    dir: String,
    #[serde(default = "default_output")]
    output: String,
    /// Directory with page templates
    templates: Option<String>,
    #[serde(default = "default_title")]
    title: String,
    /// Library version shown on each page
    version: Option<String>,
}

impl Default for ExamplesConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            output: default_output(),
            templates: None,
            title: default_title(),
            version: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LinksConfig {
    #[serde(default = "default_api_root")]
    api_root: String,
    #[serde(default = "default_loader")]
    loader: String,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            api_root: default_api_root(),
            loader: default_loader(),
        }
    }
}

fn default_dir() -> String {
    "examples".to_string()
}
fn default_output() -> String {
    "build/examples".to_string()
}
fn default_title() -> String {
    "Examples".to_string()
}
fn default_api_root() -> String {
    "../apidoc".to_string()
}
fn default_loader() -> String {
    "loader.js".to_string()
}

/// Load configuration if the file exists.
/// Returns an error if the config file exists but is malformed.
pub(crate) fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let config: ConfigFile = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    Ok(ConfigFile::default())
}

impl ConfigFile {
    /// Directory the site is built into.
    pub(crate) fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.examples.output)
    }

    fn into_build_config(self, output: Option<PathBuf>) -> BuildConfig {
        BuildConfig {
            source_dir: PathBuf::from(&self.examples.dir),
            output_dir: output.unwrap_or_else(|| self.output_dir()),
            templates_dir: self.examples.templates.map(PathBuf::from),
            title: self.examples.title,
            version: self.examples.version,
            api_root: self.links.api_root,
            loader: self.links.loader,
            ..Default::default()
        }
    }
}

/// Run the build command.
pub async fn run(config_path: &Path, output: Option<PathBuf>) -> Result<()> {
    tracing::info!("Building examples...");

    let config = load_config(config_path)?.into_build_config(output);

    let result = StaticBuilder::new(config).build().await?;

    tracing::info!(
        "Built {} examples ({} files) in {}ms",
        result.examples,
        result.files,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
