//! HTTP adapter for the search page.
//!
//! Replaces the page's DOM callbacks with small endpoints:
//! - Derived apply/remove hrefs and picker visibility for the filter panel
//! - A rendered filter-chip fragment for the current query
//! - Term highlighting for a rendered result

mod handlers;
mod routes;
mod templates;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Settings;
use crate::highlight::Highlighter;
use crate::query::LinkBuilder;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub links: Arc<LinkBuilder>,
    pub highlighter: Arc<Highlighter>,
}

impl AppState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            links: Arc::new(LinkBuilder::new(settings.search_path.clone())),
            highlighter: Arc::new(Highlighter::new(settings.highlight_config())),
        }
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(settings);
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
