//! Source loading for example pages.
//!
//! Walks a source directory into an in-memory [`FileStore`], splitting YAML
//! front-matter off each file into its metadata mapping.

pub mod frontmatter;
pub mod store;

pub use frontmatter::{extract_frontmatter, FrontmatterError, Metadata};
pub use store::{FileRecord, FileStore, SourceError};
