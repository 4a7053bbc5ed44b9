//! Static preview of generated output.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

/// Run the serve command.
pub async fn run(port: u16, dir: PathBuf, open_browser: bool) -> Result<()> {
    if !dir.exists() {
        anyhow::bail!(
            "Directory not found: {}. Run 'aibos generate' first.",
            dir.display()
        );
    }

    let addr: SocketAddr = format!("127.0.0.1:{}", port)
        .parse()
        .context("Invalid address")?;

    tracing::info!("Serving {} at http://{}", dir.display(), addr);

    // Generated modules are imported cross-origin from local dev servers.
    let app = Router::new()
        .fallback_service(ServeDir::new(&dir).append_index_html_on_directories(true))
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let index = if dir.join("docs/index.html").exists() {
        format!("http://{}/docs/index.html", addr)
    } else {
        format!("http://{}", addr)
    };
    if open_browser {
        let _ = open::that(&index);
    }

    axum::serve(listener, app).await?;

    Ok(())
}
