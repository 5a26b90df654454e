//! Example listing and word index.
//!
//! The listing page loads `index.js`, which assigns the example summaries and
//! an inverted word index to a global `info` variable:
//!
//! ```text
//! var info = {"examples":[{"link":"simple.html",...}],"index":{"map":{"0":2}}};
//! ```
//!
//! Index values map an example's position in `examples` to the number of
//! times the word occurs in that example's short description, title and tags.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use exemplar_source::{FileRecord, FileStore};

use crate::page::{example_id, INDEX_PAGE};

/// Name of the generated index script.
pub const INDEX_SCRIPT: &str = "index.js";

/// Global variable the index script assigns.
pub const INDEX_VARIABLE: &str = "info";

/// World-readable, owner-writable.
pub const INDEX_MODE: u32 = 0o644;

// Same split as the listing page search (JavaScript `\W+`).
static WORD_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").expect("Invalid word split regex"));

/// Lowercase word -> example position -> occurrence count.
pub type WordIndex = BTreeMap<String, BTreeMap<usize, u32>>;

/// Tags as written in front-matter: a list or a single comma separated string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tags {
    List(Vec<String>),
    Text(String),
}

impl Tags {
    /// All tags as one searchable string.
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Tags::List(tags) => Cow::Owned(tags.join(" ")),
            Tags::Text(text) => Cow::Borrowed(text),
        }
    }
}

/// Summary of one example page, as listed on the index page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleSummary {
    pub link: String,
    pub example: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortdesc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
}

impl ExampleSummary {
    /// Project a page's front-matter onto a summary.
    pub fn from_record(path: &str, record: &FileRecord) -> Self {
        Self {
            link: path.to_string(),
            example: path.to_string(),
            title: record.metadata.get("title").and_then(scalar_text),
            shortdesc: record.metadata.get("shortdesc").and_then(scalar_text),
            tags: record.metadata.get("tags").and_then(tags_from),
        }
    }

    /// The fields that feed the word index.
    fn indexed_fields(&self) -> [Option<Cow<'_, str>>; 3] {
        [
            self.shortdesc.as_deref().map(Cow::Borrowed),
            self.title.as_deref().map(Cow::Borrowed),
            self.tags.as_ref().map(Tags::text),
        ]
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Read `tags` leniently: YAML turns `tags: [3d, 2014]` into a mixed list.
fn tags_from(value: &Value) -> Option<Tags> {
    match value {
        Value::Array(items) => Some(Tags::List(items.iter().filter_map(scalar_text).collect())),
        other => scalar_text(other).map(Tags::Text),
    }
}

/// Options for the index stage.
#[derive(Debug, Clone)]
pub struct IndexOptions {
    /// Listing page left out of the example list
    pub index_page: String,

    /// Path of the generated script in the store
    pub output: String,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            index_page: INDEX_PAGE.to_string(),
            output: INDEX_SCRIPT.to_string(),
        }
    }
}

/// Errors raised while producing the index script.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("Failed to serialize example index: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Not an example index script: expected `var info = ...`")]
    InvalidScript,
}

/// The serialized payload of `index.js`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExampleIndex {
    pub examples: Vec<ExampleSummary>,
    pub index: WordIndex,
}

impl ExampleIndex {
    /// Build the word index for the given examples.
    pub fn new(examples: Vec<ExampleSummary>) -> Self {
        let index = build_word_index(&examples);
        Self { examples, index }
    }

    /// Render as a script assigning the index to the `info` global.
    pub fn to_script(&self) -> Result<String, IndexError> {
        let json = serde_json::to_string(self)?;
        Ok(format!("var {INDEX_VARIABLE} = {json};"))
    }

    /// Parse a script produced by [`ExampleIndex::to_script`].
    pub fn from_script(script: &str) -> Result<Self, IndexError> {
        let json = script
            .trim()
            .strip_prefix("var")
            .map(str::trim_start)
            .and_then(|s| s.strip_prefix(INDEX_VARIABLE))
            .map(str::trim_start)
            .and_then(|s| s.strip_prefix('='))
            .ok_or(IndexError::InvalidScript)?;
        let json = json.trim().trim_end_matches(';');

        Ok(serde_json::from_str(json)?)
    }
}

/// Collect summaries of every example page, in store order.
pub fn collect_examples(store: &FileStore, index_page: &str) -> Vec<ExampleSummary> {
    store
        .iter()
        .filter(|(path, _)| example_id(path, index_page).is_some())
        .map(|(path, record)| ExampleSummary::from_record(path, record))
        .collect()
}

/// Build the inverted word index over short descriptions, titles and tags.
///
/// Every occurrence counts, so a word appearing in both the title and the tags
/// of an example has a count of two for that example.
pub fn build_word_index(examples: &[ExampleSummary]) -> WordIndex {
    let mut index = WordIndex::new();

    for (position, example) in examples.iter().enumerate() {
        for text in example.indexed_fields().into_iter().flatten() {
            for word in WORD_SPLIT_RE.split(&text).filter(|w| !w.is_empty()) {
                *index
                    .entry(word.to_lowercase())
                    .or_default()
                    .entry(position)
                    .or_insert(0) += 1;
            }
        }
    }

    index
}

/// Build the example index and add it to the store as a script file.
pub fn create_index(
    store: &mut FileStore,
    options: &IndexOptions,
) -> Result<ExampleIndex, IndexError> {
    let info = ExampleIndex::new(collect_examples(store, &options.index_page));
    let script = info.to_script()?;

    store.insert(
        options.output.clone(),
        FileRecord::new(script).with_mode(INDEX_MODE),
    );

    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use exemplar_source::Metadata;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn summary(title: &str, shortdesc: &str, tags: Tags) -> ExampleSummary {
        ExampleSummary {
            link: format!("{}.html", title.to_lowercase().replace(' ', "-")),
            example: format!("{}.html", title.to_lowercase().replace(' ', "-")),
            title: Some(title.to_string()),
            shortdesc: Some(shortdesc.to_string()),
            tags: Some(tags),
        }
    }

    fn page(fields: Value) -> FileRecord {
        let metadata: Metadata = match fields {
            Value::Object(map) => map,
            _ => Metadata::new(),
        };
        FileRecord::new("<div></div>").with_metadata(metadata)
    }

    #[test]
    fn counts_words_across_fields() {
        let examples = vec![summary(
            "Draw a line",
            "",
            Tags::List(vec!["draw".to_string(), "geom".to_string()]),
        )];

        let index = build_word_index(&examples);

        let expected: WordIndex = [
            ("a", 1),
            ("draw", 2),
            ("geom", 1),
            ("line", 1),
        ]
        .into_iter()
        .map(|(word, count)| (word.to_string(), BTreeMap::from([(0, count)])))
        .collect();
        assert_eq!(index, expected);
    }

    #[test]
    fn repeated_words_increment_within_one_field() {
        let examples = vec![summary(
            "Vector layer",
            "Vector tiles on a vector layer.",
            Tags::Text("vector, tiles".to_string()),
        )];

        let index = build_word_index(&examples);

        assert_eq!(index["vector"], BTreeMap::from([(0, 4)]));
        assert_eq!(index["tiles"], BTreeMap::from([(0, 2)]));
        assert_eq!(index["layer"], BTreeMap::from([(0, 2)]));
    }

    #[test]
    fn keeps_positions_per_example() {
        let examples = vec![
            summary("Simple map", "A simple map.", Tags::Text("simple".to_string())),
            summary("Heatmap", "Earthquakes map.", Tags::Text("heatmap, kml".to_string())),
        ];

        let index = build_word_index(&examples);

        assert_eq!(index["map"], BTreeMap::from([(0, 2), (1, 1)]));
        assert_eq!(index["simple"], BTreeMap::from([(0, 3)]));
        assert_eq!(index["kml"], BTreeMap::from([(1, 1)]));
    }

    #[test]
    fn lowercases_and_drops_empty_words() {
        let examples = vec![summary("--WMS--", "  ", Tags::Text(",,".to_string()))];

        let index = build_word_index(&examples);

        assert_eq!(index.keys().collect::<Vec<_>>(), vec!["wms"]);
    }

    #[test]
    fn missing_fields_are_skipped() {
        let examples = vec![ExampleSummary {
            link: "bare.html".to_string(),
            example: "bare.html".to_string(),
            title: None,
            shortdesc: None,
            tags: None,
        }];

        assert!(build_word_index(&examples).is_empty());
    }

    #[test]
    fn collects_example_pages_only() {
        let mut store = FileStore::new();
        store.insert(
            "simple.html",
            page(json!({"title": "Simple map", "shortdesc": "A simple map.", "tags": "simple, openstreetmap"})),
        );
        store.insert("simple.js", FileRecord::new("var map;"));
        store.insert("index.html", page(json!({"title": "Examples"})));
        store.insert("data/readme.html", page(json!({"title": "Data"})));
        store.insert("animation.html", page(json!({"title": "Animation", "tags": ["animation", "view"]})));

        let examples = collect_examples(&store, INDEX_PAGE);

        assert_eq!(
            examples,
            vec![
                ExampleSummary {
                    link: "animation.html".to_string(),
                    example: "animation.html".to_string(),
                    title: Some("Animation".to_string()),
                    shortdesc: None,
                    tags: Some(Tags::List(vec!["animation".to_string(), "view".to_string()])),
                },
                ExampleSummary {
                    link: "simple.html".to_string(),
                    example: "simple.html".to_string(),
                    title: Some("Simple map".to_string()),
                    shortdesc: Some("A simple map.".to_string()),
                    tags: Some(Tags::Text("simple, openstreetmap".to_string())),
                },
            ]
        );
    }

    #[test]
    fn keeps_non_string_tags_as_text() {
        let record = page(json!({"title": "3D", "tags": ["3d", 2014, true, null]}));

        let example = ExampleSummary::from_record("terrain.html", &record);
        assert_eq!(
            example.tags,
            Some(Tags::List(vec!["3d".to_string(), "2014".to_string(), "true".to_string()]))
        );

        let numeric = ExampleSummary::from_record("year.html", &page(json!({"tags": 2014})));
        assert_eq!(numeric.tags, Some(Tags::Text("2014".to_string())));

        let index = build_word_index(&[example]);
        assert_eq!(index["2014"], BTreeMap::from([(0, 1)]));
        assert_eq!(index["3d"], BTreeMap::from([(0, 2)]));
    }

    #[test]
    fn creates_index_script_in_store() {
        let mut store = FileStore::new();
        store.insert("simple.html", page(json!({"title": "Simple map"})));
        store.insert("draw.html", page(json!({"title": "Draw a line", "tags": ["draw", "geom"]})));

        let info = create_index(&mut store, &IndexOptions::default()).unwrap();

        let record = store.get(INDEX_SCRIPT).unwrap();
        assert_eq!(record.mode, Some(0o644));

        let script = record.text();
        assert!(script.starts_with("var info = {"));

        let parsed = ExampleIndex::from_script(&script).unwrap();
        assert_eq!(parsed, info);
        assert_eq!(parsed.examples.len(), 2);
        assert!(parsed
            .index
            .keys()
            .all(|word| !word.is_empty() && *word == word.to_lowercase()));
        assert_eq!(parsed.index["draw"], BTreeMap::from([(0, 2)]));
        assert_eq!(parsed.index["simple"], BTreeMap::from([(1, 1)]));
    }

    #[test]
    fn serializes_positions_as_object_keys() {
        let info = ExampleIndex::new(vec![summary("Tiles", "", Tags::List(vec![]))]);

        let script = info.to_script().unwrap();

        assert!(script.contains(r#""index":{"tiles":{"0":1}}"#));
        assert!(script.ends_with(';'));
    }

    #[test]
    fn rejects_foreign_scripts() {
        assert!(matches!(
            ExampleIndex::from_script("window.other = {};"),
            Err(IndexError::InvalidScript)
        ));
    }
}
