//! Build stages and the pipeline that runs them.
//!
//! Every stage owns the whole [`FileStore`] while it runs and stages execute
//! strictly one after another. The first failing stage aborts the pipeline.

use rayon::prelude::*;
use serde_json::Value;

use exemplar_core::{augment_examples, create_index, AugmentOptions, IndexOptions};
use exemplar_source::{FileStore, Metadata};

use crate::builder::BuildError;
use crate::templates::TemplateEngine;

/// A synchronous step over the file collection.
pub trait Stage: Send + Sync {
    /// Stage identifier used in logs
    fn name(&self) -> &'static str;

    /// Transform the store in place.
    fn run(&self, store: &mut FileStore) -> Result<(), BuildError>;
}

/// Attaches script, stylesheet and API link markup to example pages.
pub struct AugmentStage {
    options: AugmentOptions,
}

impl AugmentStage {
    pub fn new(options: AugmentOptions) -> Self {
        Self { options }
    }
}

impl Stage for AugmentStage {
    fn name(&self) -> &'static str {
        "augment"
    }

    fn run(&self, store: &mut FileStore) -> Result<(), BuildError> {
        let count = augment_examples(store, &self.options)?;
        tracing::info!("Augmented {} examples", count);
        Ok(())
    }
}

/// Generates the example listing and word index script.
pub struct IndexStage {
    options: IndexOptions,
}

impl IndexStage {
    pub fn new(options: IndexOptions) -> Self {
        Self { options }
    }
}

impl Stage for IndexStage {
    fn name(&self) -> &'static str {
        "index"
    }

    fn run(&self, store: &mut FileStore) -> Result<(), BuildError> {
        let info = create_index(store, &self.options)?;
        tracing::info!(
            "Indexed {} examples ({} words)",
            info.examples.len(),
            info.index.len()
        );
        Ok(())
    }
}

/// Renders every file that names a `template` in its metadata.
pub struct TemplateStage {
    engine: TemplateEngine,
    site: Metadata,
}

impl TemplateStage {
    /// `site` values are visible to every template; page metadata overrides them.
    pub fn new(engine: TemplateEngine, site: Metadata) -> Self {
        Self { engine, site }
    }

    /// Build the render context for one page.
    fn context(&self, metadata: &Metadata, contents: String) -> Metadata {
        let mut context = self.site.clone();
        context.extend(metadata.iter().map(|(k, v)| (k.clone(), v.clone())));
        context.insert("contents".to_string(), Value::String(contents));
        context
    }
}

impl Stage for TemplateStage {
    fn name(&self) -> &'static str {
        "templates"
    }

    fn run(&self, store: &mut FileStore) -> Result<(), BuildError> {
        let jobs: Vec<(String, String, Metadata)> = store
            .iter()
            .filter_map(|(path, record)| {
                let template = record.meta_str("template")?;
                let context = self.context(&record.metadata, record.text().into_owned());
                Some((path.to_string(), template.to_string(), context))
            })
            .collect();

        // Pages render in parallel; the store is only written afterwards.
        let rendered: Vec<Result<(String, String), BuildError>> = jobs
            .par_iter()
            .map(|(path, template, context)| {
                self.engine
                    .render(template, context)
                    .map(|html| (path.clone(), html))
                    .map_err(|e| BuildError::TemplateError {
                        path: path.clone(),
                        message: e.to_string(),
                    })
            })
            .collect();

        let mut count = 0;
        for result in rendered {
            let (path, html) = result?;
            if let Some(record) = store.get_mut(&path) {
                record.contents = html.into_bytes();
                count += 1;
            }
        }

        tracing::info!("Rendered {} pages", count);

        Ok(())
    }
}

/// An ordered list of stages.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage.
    pub fn with(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Names of the stages, in execution order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run every stage in order, stopping at the first error.
    pub fn run(&self, store: &mut FileStore) -> Result<(), BuildError> {
        for stage in &self.stages {
            tracing::debug!("Running stage '{}'", stage.name());
            stage.run(store)?;
        }
        Ok(())
    }
}
