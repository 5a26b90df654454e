//! Scaffold an examples project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command in the current directory.
pub async fn run(yes: bool) -> Result<()> {
    tracing::info!("Initializing examples...");

    scaffold(Path::new("."), yes)?;

    tracing::info!("Run 'exemplar build' to build the examples.");

    Ok(())
}

/// Write the config and a sample example below `root`.
///
/// Existing files are only replaced when `yes` is set.
fn scaffold(root: &Path, yes: bool) -> Result<()> {
    let examples_dir = root.join("examples");

    if examples_dir.exists() {
        if !yes {
            tracing::warn!("examples/ directory already exists. Use --yes to overwrite.");
            return Ok(());
        }
    } else {
        fs::create_dir_all(&examples_dir).context("Failed to create examples directory")?;
    }

    let files = [
        (root.join("examples.toml"), DEFAULT_CONFIG),
        (examples_dir.join("index.html"), DEFAULT_INDEX),
        (examples_dir.join("simple.html"), SIMPLE_HTML),
        (examples_dir.join("simple.js"), SIMPLE_JS),
        (examples_dir.join("simple.css"), SIMPLE_CSS),
    ];

    for (path, content) in files {
        if !path.exists() || yes {
            fs::write(&path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Created {}", path.display());
        }
    }

    tracing::info!("Initialization complete!");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Exemplar Configuration

[examples]
# Source directory with <id>.html / <id>.js / <id>.css triples
dir = "examples"

# Output directory for the built site
output = "build/examples"

# Site title
title = "Examples"

# Directory with page templates (optional, built-in templates otherwise)
# templates = "config/examples"

[links]
# Prefix for API documentation links
api_root = "../apidoc"

# Script loading an example by id
loader = "loader.js"
"#;

const DEFAULT_INDEX: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Examples</title>
  <script src="index.js"></script>
</head>
<body>
  <input id="keywords" type="search" placeholder="Search examples">
  <ul id="examples"></ul>
  <script>
    var list = document.getElementById('examples');
    var keywords = document.getElementById('keywords');

    function render(examples) {
      list.innerHTML = '';
      examples.forEach(function(example) {
        var item = document.createElement('li');
        var link = document.createElement('a');
        link.href = example.link;
        link.textContent = example.title || example.example;
        item.appendChild(link);
        list.appendChild(item);
      });
    }

    function search(query) {
      var words = query.toLowerCase().split(/\W+/).filter(function(word) {
        return word.length > 0;
      });
      if (words.length === 0) {
        return info.examples;
      }
      var scores = {};
      words.forEach(function(word) {
        var hits = Object.prototype.hasOwnProperty.call(info.index, word) ? info.index[word] : {};
        Object.keys(hits).forEach(function(i) {
          scores[i] = (scores[i] || 0) + hits[i];
        });
      });
      return Object.keys(scores)
        .sort(function(a, b) { return scores[b] - scores[a] || a - b; })
        .map(function(i) { return info.examples[i]; });
    }

    keywords.addEventListener('input', function() {
      render(search(keywords.value));
    });
    render(info.examples);
  </script>
</body>
</html>
"#;

const SIMPLE_HTML: &str = r#"---
template: example.html
title: Simple map
shortdesc: A simple map with an OSM source.
docs: >
  A simple map with an **OpenStreetMap** tile layer.
tags: "simple, openstreetmap"
---
<div id="map" class="map"></div>
"#;

const SIMPLE_JS: &str = r#"goog.require('ol.Map');
goog.require('ol.View');
goog.require('ol.layer.Tile');
goog.require('ol.source.OSM');


var map = new ol.Map({
  layers: [
    new ol.layer.Tile({
      source: new ol.source.OSM()
    })
  ],
  renderer: exampleNS.getRendererFromQueryString(),
  target: 'map',
  view: new ol.View({
    center: [0, 0],
    zoom: 2
  })
});
"#;

const SIMPLE_CSS: &str = r#".map {
  height: 400px;
  width: 100%;
}
"#;
