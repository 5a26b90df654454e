//! Example page naming.

/// The listing page that links to every example. It is not an example itself.
pub const INDEX_PAGE: &str = "index.html";

/// Return the example id for `path` if it names an example page.
///
/// Example pages are top-level `<id>.html` files other than `index_page`.
pub fn example_id<'a>(path: &'a str, index_page: &str) -> Option<&'a str> {
    if path == index_page || path.contains('/') {
        return None;
    }

    path.strip_suffix(".html").filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_top_level_html_pages() {
        assert_eq!(example_id("simple.html", INDEX_PAGE), Some("simple"));
        assert_eq!(example_id("draw-features.html", INDEX_PAGE), Some("draw-features"));
    }

    #[test]
    fn rejects_index_and_other_files() {
        assert_eq!(example_id("index.html", INDEX_PAGE), None);
        assert_eq!(example_id("simple.js", INDEX_PAGE), None);
        assert_eq!(example_id("data/kml/page.html", INDEX_PAGE), None);
        assert_eq!(example_id(".html", INDEX_PAGE), None);
    }

    #[test]
    fn honours_custom_index_page() {
        assert_eq!(example_id("index.html", "examples.html"), Some("index"));
        assert_eq!(example_id("examples.html", "examples.html"), None);
    }
}
