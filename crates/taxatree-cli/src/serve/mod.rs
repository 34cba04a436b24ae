//! Local web server for the interactive tree viewer.
//!
//! Serves a single-page UI that renders the chart with Plotly: markers
//! per taxon, right-angled connectors, and a stats strip. The page
//! requests `/api/tree` with the selected group and draws the result.
//!
//! # Module Structure
//!
//! - `handlers` - HTTP route handlers
//! - `templates` - HTML/CSS/JS template rendering

mod handlers;
mod templates;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use color_eyre::eyre::Result;
use tower_http::cors::{Any, CorsLayer};

use taxatree_core::{FileCache, INaturalistClient, LayoutOptions, TreePipeline};

/// Shared application state for the server.
pub struct AppState {
    /// Pipeline serving tree requests. Builds are cached, so repeated
    /// page loads do not refetch.
    pub pipeline: TreePipeline<INaturalistClient, FileCache>,

    /// Layout spacing used for every chart.
    pub layout: LayoutOptions,

    /// The user whose observations are shown.
    pub username: String,
}

/// Configuration for the viewer server.
pub struct ServeConfig {
    /// Port to listen on.
    pub port: u16,

    /// Whether to open the browser automatically.
    pub open_browser: bool,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            port: 3333,
            open_browser: true,
        }
    }
}

/// Start the tree viewer server.
pub async fn start_server(
    pipeline: TreePipeline<INaturalistClient, FileCache>,
    layout: LayoutOptions,
    username: String,
    config: ServeConfig,
) -> Result<()> {
    let state = Arc::new(AppState {
        pipeline,
        layout,
        username,
    });

    let app = Router::new()
        .route("/", get(handlers::index))
        .route("/api/tree", get(handlers::api_tree))
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let url = format!("http://localhost:{}", config.port);

    println!("Starting TaxaTree viewer...");
    println!("Dashboard: {}", url);
    println!("Press Ctrl+C to stop\n");

    if config.open_browser {
        if let Err(e) = open::that(&url) {
            eprintln!("Could not open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
