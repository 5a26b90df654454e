//! Example augmentation and search index construction.
//!
//! This crate holds the build stages that turn loaded example sources into
//! template-ready pages: API link extraction from example scripts, page
//! augmentation, and the word index behind the example listing.

pub mod augment;
pub mod index;
pub mod page;
pub mod symbols;

pub use augment::{augment_examples, AugmentError, AugmentOptions};
pub use index::{
    build_word_index, collect_examples, create_index, ExampleIndex, ExampleSummary, IndexError,
    IndexOptions, Tags, WordIndex, INDEX_MODE, INDEX_SCRIPT,
};
pub use page::{example_id, INDEX_PAGE};
pub use symbols::{api_links_html, cleanup_source, extract_requires, DEFAULT_API_ROOT};
