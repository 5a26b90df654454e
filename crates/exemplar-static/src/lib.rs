//! Static site generator for library examples.
//!
//! Loads example sources, runs the augment, index and template stages over
//! them, and writes the resulting pages to an output directory.

pub mod builder;
pub mod pipeline;
pub mod templates;

pub use builder::{BuildConfig, BuildError, BuildResult, StaticBuilder};
pub use pipeline::{AugmentStage, IndexStage, Pipeline, Stage, TemplateStage};
pub use templates::{render_markdown, TemplateEngine};
