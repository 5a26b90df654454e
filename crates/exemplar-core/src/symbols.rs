//! Library symbol references in example scripts.
//!
//! Examples declare the library symbols they use with
//! `goog.require('ol.Map');` lines. Those declarations drive the
//! "Related API documentation" links and are stripped from the source shown
//! on the page.

use std::sync::LazyLock;

use regex::Regex;

/// Default location of the API documentation, relative to an example page.
pub const DEFAULT_API_ROOT: &str = "../apidoc";

static REQUIRE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"goog\.require\('([A-Za-z_$][\w$]*(?:\.[A-Za-z_$][\w$]*)*)'\);")
        .expect("Invalid require regex")
});

// Whole lines holding a require call or the renderer selection boilerplate.
static CLEANUP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^.*(?:goog\.require\(.*\);|renderer: exampleNS\.).*(?:\r?\n|$)")
        .expect("Invalid cleanup regex")
});

/// Collect the symbol names declared with `goog.require('<name>');`.
///
/// Matches are returned left to right, duplicates included. Text that does not
/// match the declaration form is ignored.
pub fn extract_requires(source: &str) -> Vec<String> {
    REQUIRE_RE
        .captures_iter(source)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Render an inline list linking each symbol to its API page.
///
/// One `<li>` per symbol, in the order given. An empty slice renders an empty
/// list element.
pub fn api_links_html<S: AsRef<str>>(symbols: &[S], api_root: &str) -> String {
    let root = api_root.trim_end_matches('/');

    let items: String = symbols
        .iter()
        .map(|symbol| {
            let symbol = symbol.as_ref();
            format!(
                r#"<li><a href="{root}/{symbol}.html" title="API documentation for {symbol}">{symbol}</a></li>"#
            )
        })
        .collect();

    format!(r#"<ul class="inline">{items}</ul>"#)
}

/// Strip require declarations and renderer boilerplate from example source.
///
/// Every other line is kept unchanged and in order.
pub fn cleanup_source(source: &str) -> String {
    CLEANUP_RE.replace_all(source, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SCRIPT: &str = "goog.require('ol.Map');
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
";

    #[test]
    fn extracts_requires_in_source_order() {
        assert_eq!(
            extract_requires(SCRIPT),
            vec!["ol.Map", "ol.View", "ol.layer.Tile", "ol.source.OSM"]
        );
    }

    #[test]
    fn keeps_duplicate_requires() {
        let source = "goog.require('ol.Map');\ngoog.require('ol.View');\ngoog.require('ol.Map');\n";

        assert_eq!(extract_requires(source), vec!["ol.Map", "ol.View", "ol.Map"]);
    }

    #[test]
    fn ignores_malformed_declarations() {
        let source = "goog.require(\"ol.Map\");\ngoog.require('ol.View')\nrequire('ol.Feature');\n";

        assert!(extract_requires(source).is_empty());
        assert!(extract_requires("").is_empty());
    }

    #[test]
    fn finds_several_declarations_on_one_line() {
        let source = "goog.require('ol.Map');goog.require('ol.View');";

        assert_eq!(extract_requires(source), vec!["ol.Map", "ol.View"]);
    }

    #[test]
    fn renders_one_item_per_symbol() {
        let html = api_links_html(&["ol.Map", "ol.View", "ol.Map"], DEFAULT_API_ROOT);

        assert_eq!(html.matches("<li>").count(), 3);
        assert_eq!(html.matches(r#"href="../apidoc/ol.Map.html""#).count(), 2);
        assert!(html.starts_with(r#"<ul class="inline"><li><a href="../apidoc/ol.Map.html" title="API documentation for ol.Map">ol.Map</a></li>"#));
        assert!(html.ends_with("</li></ul>"));
    }

    #[test]
    fn renders_empty_list_for_no_symbols() {
        let none: [&str; 0] = [];

        assert_eq!(api_links_html(&none, "../apidoc/"), r#"<ul class="inline"></ul>"#);
    }

    #[test]
    fn trims_trailing_slash_from_api_root() {
        let html = api_links_html(&["ol.Map"], "/apidoc/");

        assert!(html.contains(r#"href="/apidoc/ol.Map.html""#));
    }

    #[test]
    fn cleanup_removes_boilerplate_lines_only() {
        let cleaned = cleanup_source(SCRIPT);

        assert!(!cleaned.contains("goog.require"));
        assert!(!cleaned.contains("renderer: exampleNS"));
        assert_eq!(
            cleaned,
            "

var map = new ol.Map({
  layers: [
    new ol.layer.Tile({
      source: new ol.source.OSM()
    })
  ],
  target: 'map',
  view: new ol.View({
    center: [0, 0],
    zoom: 2
  })
});
"
        );
    }

    #[test]
    fn cleanup_handles_last_line_without_newline() {
        assert_eq!(
            cleanup_source("var a = 1;\ngoog.require('ol.Map');"),
            "var a = 1;\n"
        );
        assert_eq!(cleanup_source("var a = 1;"), "var a = 1;");
    }
}
