//! In-memory file collection shared by every build stage.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use walkdir::WalkDir;

use crate::frontmatter::{extract_frontmatter, FrontmatterError, Metadata};

/// A single source file: raw contents plus front-matter metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileRecord {
    /// Raw file contents (front-matter stripped)
    pub contents: Vec<u8>,

    /// Metadata parsed from front-matter, extended by build stages
    pub metadata: Metadata,

    /// Unix permission bits to apply when the file is written
    pub mode: Option<u32>,
}

impl FileRecord {
    /// Create a record with the given contents and no metadata.
    pub fn new(contents: impl Into<Vec<u8>>) -> Self {
        Self {
            contents: contents.into(),
            ..Default::default()
        }
    }

    /// Attach metadata to the record.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Set the permission bits used when writing the record.
    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Contents as text, replacing invalid UTF-8 sequences.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.contents)
    }

    /// Look up a string-valued metadata field.
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }
}

/// Errors raised while loading sources from disk.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Source directory not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to walk {path}: {message}")]
    Walk { path: PathBuf, message: String },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid front-matter in {path}: {source}")]
    Frontmatter {
        path: String,
        source: FrontmatterError,
    },
}

/// The file collection, keyed by `/`-separated path relative to the source root.
///
/// Iteration follows the ordering of the path keys. Stages should treat that as the
/// only ordering guarantee.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileStore {
    files: BTreeMap<String, FileRecord>,
}

impl FileStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every regular file below `root`, parsing front-matter of HTML pages.
    pub fn load(root: &Path) -> Result<Self, SourceError> {
        if !root.is_dir() {
            return Err(SourceError::NotFound(root.to_path_buf()));
        }

        let mut store = Self::new();

        for entry in WalkDir::new(root).follow_links(true) {
            let entry = entry.map_err(|e| SourceError::Walk {
                path: e.path().unwrap_or(root).to_path_buf(),
                message: e.to_string(),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let key = relative_key(root, path);

            let bytes = fs::read(path).map_err(|source| SourceError::Read {
                path: path.to_path_buf(),
                source,
            })?;

            let record = parse_record(&key, bytes).map_err(|source| SourceError::Frontmatter {
                path: key.clone(),
                source,
            })?;

            store.insert(key, record);
        }

        tracing::debug!("Loaded {} files from {}", store.len(), root.display());

        Ok(store)
    }

    /// Insert a record, returning the one it replaced.
    pub fn insert(&mut self, path: impl Into<String>, record: FileRecord) -> Option<FileRecord> {
        self.files.insert(path.into(), record)
    }

    pub fn get(&self, path: &str) -> Option<&FileRecord> {
        self.files.get(path)
    }

    pub fn get_mut(&mut self, path: &str) -> Option<&mut FileRecord> {
        self.files.get_mut(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// All paths, in iteration order.
    pub fn paths(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FileRecord)> {
        self.files.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut FileRecord)> {
        self.files.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Split front-matter off an HTML page. Other files, and non-UTF-8 pages, are
/// kept as-is: a YAML asset starting with `---` is data, not front-matter.
fn parse_record(key: &str, bytes: Vec<u8>) -> Result<FileRecord, FrontmatterError> {
    if !key.ends_with(".html") {
        return Ok(FileRecord::new(bytes));
    }
    let Ok(text) = std::str::from_utf8(&bytes) else {
        return Ok(FileRecord::new(bytes));
    };

    match extract_frontmatter(text)? {
        (Some(metadata), body) => Ok(FileRecord::new(body).with_metadata(metadata)),
        (None, _) => Ok(FileRecord::new(bytes)),
    }
}

/// Build the store key for `path`: components below `root` joined with `/`.
fn relative_key(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
