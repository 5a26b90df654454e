//! Template engine for rendering example pages.

use std::fs;
use std::path::{Path, PathBuf};

use minijinja::{Environment, ErrorKind, Value};
use pulldown_cmark::{html, Options, Parser};
use serde::Serialize;

/// Template engine using minijinja.
///
/// Templates are looked up in the configured directory first and fall back to
/// the built-in set, so a project only has to ship the templates it changes.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a template engine, optionally backed by a template directory.
    pub fn new(dir: Option<PathBuf>) -> Self {
        let mut env = Environment::new();

        env.set_loader(move |name| load_template(dir.as_deref(), name));
        env.add_filter("md", markdown_filter);

        Self { env }
    }

    /// Render a template with the given context.
    pub fn render<S: Serialize>(&self, template: &str, context: S) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(template)?;
        tmpl.render(context)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Resolve a template by name: directory first, then built-ins.
fn load_template(dir: Option<&Path>, name: &str) -> Result<Option<String>, minijinja::Error> {
    if name.split(['/', '\\']).any(|segment| segment == "..") {
        return Ok(None);
    }

    if let Some(dir) = dir {
        let path = dir.join(name);
        if path.is_file() {
            return fs::read_to_string(&path).map(Some).map_err(|e| {
                minijinja::Error::new(
                    ErrorKind::InvalidOperation,
                    format!("could not read template {}", path.display()),
                )
                .with_source(e)
            });
        }
    }

    Ok(builtin_template(name).map(str::to_string))
}

fn builtin_template(name: &str) -> Option<&'static str> {
    match name {
        "example.html" => Some(EXAMPLE_TEMPLATE),
        _ => None,
    }
}

/// Render Markdown to HTML.
pub fn render_markdown(source: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    let parser = Parser::new_ext(source, options);

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    html_output
}

fn markdown_filter(value: String) -> Value {
    Value::from_safe_string(render_markdown(&value))
}

const EXAMPLE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }}{% if site_title %} - {{ site_title }}{% endif %}</title>
  <link rel="stylesheet" href="../css/ol.css">
  <link rel="stylesheet" href="./resources/layout.css">
  {% if css %}{{ css.tag | safe }}{% endif %}
  {% if extraHead %}{{ extraHead | safe }}{% endif %}
</head>
<body>
  <div class="container">
    <h4 class="example-title">{{ title }}</h4>
    {{ contents | safe }}
    <div class="example-info">
      {% if shortdesc %}<p class="shortdesc">{{ shortdesc }}</p>{% endif %}
      {% if docs %}<div class="docs">{{ docs | md }}</div>{% endif %}
      {% if tags %}<p class="tags">Tags: {% if tags is string %}{{ tags }}{% else %}{{ tags | join(", ") }}{% endif %}</p>{% endif %}
      <div class="api-links">Related API documentation: {{ js.apiHtml | safe }}</div>
    </div>
    <div class="source">
      <h5>{{ title }} source</h5>
      <pre><code class="language-markup">{{ contents }}</code></pre>
      <pre><code class="language-js">{{ js.source }}</code></pre>
      {% if css %}<pre><code class="language-css">{{ css.source }}</code></pre>{% endif %}
    </div>
  </div>
  {{ js.tag | safe }}
  {% if version %}<footer class="version">v{{ version }}</footer>{% endif %}
</body>
</html>"##;
