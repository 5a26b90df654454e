//! Front-matter extraction and parsing.

use serde_json::{Map, Value};

/// Metadata attached to a source file, keyed by front-matter field name.
pub type Metadata = Map<String, Value>;

/// Extract YAML front-matter from a source file.
///
/// Returns the parsed metadata and the remaining content after the front-matter block.
/// An empty block (`---` immediately followed by `---`) yields empty metadata.
pub fn extract_frontmatter(source: &str) -> Result<(Option<Metadata>, &str), FrontmatterError> {
    let trimmed = source.trim_start();

    if !trimmed.starts_with("---") {
        return Ok((None, source));
    }

    // Find the closing ---
    let after_open = &trimmed[3..];
    let Some(close_pos) = after_open.find("\n---") else {
        return Err(FrontmatterError::Unclosed);
    };

    let yaml_content = after_open[..close_pos].trim();
    let remaining = &after_open[close_pos + 4..];

    let metadata = if yaml_content.is_empty() {
        Metadata::new()
    } else {
        match serde_yaml::from_str::<Value>(yaml_content)
            .map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?
        {
            Value::Object(map) => map,
            Value::Null => Metadata::new(),
            _ => return Err(FrontmatterError::NotAMapping),
        }
    };

    Ok((Some(metadata), remaining.trim_start()))
}

/// Errors that can occur when parsing front-matter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Unclosed front-matter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in front-matter: {0}")]
    InvalidYaml(String),

    #[error("Front-matter must be a mapping of field names to values")]
    NotAMapping,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn extracts_valid_frontmatter() {
        let source = r#"---
template: example.html
title: Draw features
shortdesc: Example of using the Draw interaction.
tags: "draw, edit, freehand"
resources:
  - https://code.jquery.com/jquery-1.11.2.min.js
---
<div id="map" class="map"></div>
"#;

        let (fm, content) = extract_frontmatter(source).unwrap();
        let fm = fm.unwrap();

        assert_eq!(fm["template"], json!("example.html"));
        assert_eq!(fm["title"], json!("Draw features"));
        assert_eq!(
            fm["resources"],
            json!(["https://code.jquery.com/jquery-1.11.2.min.js"])
        );
        assert!(content.starts_with("<div id=\"map\""));
    }

    #[test]
    fn handles_no_frontmatter() {
        let source = "<html><body></body></html>";

        let (fm, content) = extract_frontmatter(source).unwrap();

        assert!(fm.is_none());
        assert_eq!(content, source);
    }

    #[test]
    fn empty_block_yields_empty_metadata() {
        let (fm, content) = extract_frontmatter("---\n---\nbody").unwrap();

        assert_eq!(fm, Some(Metadata::new()));
        assert_eq!(content, "body");
    }

    #[test]
    fn errors_on_unclosed_frontmatter() {
        let source = "---\ntitle: Test\n<p>No closing</p>";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::Unclosed)));
    }

    #[test]
    fn errors_on_invalid_yaml() {
        let source = "---\ntitle: [invalid yaml\n---\n";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::InvalidYaml(_))));
    }

    #[test]
    fn errors_on_scalar_frontmatter() {
        let result = extract_frontmatter("---\njust a string\n---\n");

        assert!(matches!(result, Err(FrontmatterError::NotAMapping)));
    }
}
