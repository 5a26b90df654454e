//! Example augmentation.
//!
//! Attaches to every example page the markup its template needs: the loader
//! script tag, the cleaned example source, links to the API docs of the
//! required symbols, the page stylesheet and any extra resources declared in
//! front-matter.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{json, Value};

use exemplar_source::{FileRecord, FileStore};

use crate::page::{example_id, INDEX_PAGE};
use crate::symbols::{api_links_html, cleanup_source, extract_requires, DEFAULT_API_ROOT};

static JS_RESOURCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.js(\?.*)?$").expect("Invalid js resource regex"));

static CSS_RESOURCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.css$").expect("Invalid css resource regex"));

/// Options controlling the generated markup.
#[derive(Debug, Clone)]
pub struct AugmentOptions {
    /// Prefix for API documentation links
    pub api_root: String,

    /// Script that loads an example by id (`<loader>?id=<id>`)
    pub loader: String,

    /// Listing page excluded from augmentation
    pub index_page: String,
}

impl Default for AugmentOptions {
    fn default() -> Self {
        Self {
            api_root: DEFAULT_API_ROOT.to_string(),
            loader: "loader.js".to_string(),
            index_page: INDEX_PAGE.to_string(),
        }
    }
}

/// Errors that stop augmentation. All of them abort the build.
#[derive(Debug, thiserror::Error)]
pub enum AugmentError {
    #[error("{path}: Missing template in YAML front-matter")]
    MissingTemplate { path: String },

    #[error("No .js file found for {path}")]
    MissingScript { path: String },

    #[error("Invalid value for resource: {resource} is not .js or .css: {path}")]
    InvalidResource { resource: String, path: String },

    #[error("{path}: resources must be a list of paths")]
    MalformedResources { path: String },
}

/// Everything attached to a single page.
#[derive(Debug)]
struct Attachments {
    js: Value,
    css: Option<Value>,
    extra_head: Option<String>,
}

/// Augment every example page in the store.
///
/// Returns the number of pages augmented. Stops at the first page that fails
/// validation; pages visited before it keep their new metadata.
pub fn augment_examples(
    store: &mut FileStore,
    options: &AugmentOptions,
) -> Result<usize, AugmentError> {
    let mut count = 0;

    for path in store.paths() {
        let Some(id) = example_id(&path, &options.index_page) else {
            continue;
        };

        let attachments = prepare(store, &path, id, options)?;

        if let Some(page) = store.get_mut(&path) {
            page.metadata.insert("js".to_string(), attachments.js);
            if let Some(css) = attachments.css {
                page.metadata.insert("css".to_string(), css);
            }
            if let Some(extra_head) = attachments.extra_head {
                page.metadata
                    .insert("extraHead".to_string(), Value::String(extra_head));
            }
            count += 1;
        }
    }

    Ok(count)
}

/// Validate one page and build its attachments without touching the store.
fn prepare(
    store: &FileStore,
    path: &str,
    id: &str,
    options: &AugmentOptions,
) -> Result<Attachments, AugmentError> {
    let page = store
        .get(path)
        .filter(|page| page.meta_str("template").is_some_and(|t| !t.is_empty()))
        .ok_or_else(|| AugmentError::MissingTemplate {
            path: path.to_string(),
        })?;

    let js_path = format!("{id}.js");
    let Some(script) = store.get(&js_path) else {
        return Err(AugmentError::MissingScript {
            path: path.to_string(),
        });
    };

    let raw = script.text();
    let symbols = extract_requires(&raw);
    tracing::trace!("{} requires {:?}", js_path, symbols);

    let js = json!({
        "tag": format!(r#"<script src="{}?id={id}"></script>"#, options.loader),
        "source": cleanup_source(&raw),
        "apiHtml": api_links_html(&symbols, &options.api_root),
    });

    let css_path = format!("{id}.css");
    let css = store.get(&css_path).map(|style| {
        json!({
            "tag": format!(r#"<link rel="stylesheet" href="{css_path}">"#),
            "source": style.text(),
        })
    });

    let extra_head = resource_tags(page, path)?.map(|tags| tags.join("\n"));

    Ok(Attachments {
        js,
        css,
        extra_head,
    })
}

/// Render the `resources` front-matter list into head tags, in order.
fn resource_tags(page: &FileRecord, path: &str) -> Result<Option<Vec<String>>, AugmentError> {
    let resources = match page.metadata.get("resources") {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(AugmentError::MalformedResources {
                path: path.to_string(),
            })
        }
    };

    resources
        .iter()
        .map(|item| {
            let resource = item.as_str().ok_or_else(|| AugmentError::MalformedResources {
                path: path.to_string(),
            })?;
            resource_tag(resource).ok_or_else(|| AugmentError::InvalidResource {
                resource: resource.to_string(),
                path: path.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

/// Head tag for a single resource, or `None` if it is neither script nor stylesheet.
fn resource_tag(resource: &str) -> Option<String> {
    if JS_RESOURCE_RE.is_match(resource) {
        Some(format!(r#"<script src="{resource}"></script>"#))
    } else if CSS_RESOURCE_RE.is_match(resource) {
        Some(format!(r#"<link rel="stylesheet" href="{resource}">"#))
    } else {
        None
    }
}
