//! Preview server command.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use axum::Router;
use tower_http::services::ServeDir;

use super::build::load_config;

/// Run the serve command.
///
/// Without `--dir`, serves the `[examples] output` directory from the config.
pub async fn run(config_path: &Path, port: u16, dir: Option<PathBuf>) -> Result<()> {
    let dir = site_dir(config_path, dir)?;

    if !dir.is_dir() {
        anyhow::bail!(
            "Directory not found: {}. Run 'exemplar build' first.",
            dir.display()
        );
    }

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let app = Router::new().fallback_service(ServeDir::new(&dir));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Serving {} at http://{}", dir.display(), addr);

    // The listing page is the entry point of the built examples.
    let url = format!("http://{}/index.html", addr);
    if let Err(e) = open::that(&url) {
        tracing::debug!("Could not open browser: {}", e);
    }

    axum::serve(listener, app).await?;

    Ok(())
}

/// The directory to serve: `dir` when given, else the configured build output.
fn site_dir(config_path: &Path, dir: Option<PathBuf>) -> Result<PathBuf> {
    match dir {
        Some(dir) => Ok(dir),
        None => Ok(load_config(config_path)?.output_dir()),
    }
}
