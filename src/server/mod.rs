//! Preview server for the generated pages
//!
//! Only files present in the public directory are served. A post id that
//! was not generated is a plain 404; nothing is rendered on demand.

use anyhow::Result;
use axum::Router;
use std::net::SocketAddr;
use std::path::Path;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::Site;

/// Router serving a public directory
pub fn router(public_dir: &Path) -> Router {
    let files = ServeDir::new(public_dir).append_index_html_on_directories(true);

    Router::new()
        .fallback_service(files)
        .layer(TraceLayer::new_for_http())
}

/// Start the preview server
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    if !site.public_dir.exists() {
        tracing::warn!(
            "{:?} does not exist yet; run `generate` first",
            site.public_dir
        );
    }

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(&site.public_dir)).await?;

    Ok(())
}
