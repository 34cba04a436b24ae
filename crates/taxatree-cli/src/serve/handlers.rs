//! HTTP route handlers for the tree viewer.
//!
//! Handlers are kept thin: filter resolution and error mapping here,
//! everything else in the pipeline and chart builder.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    Json,
};
use serde::Deserialize;
use tracing::error;

use taxatree_core::config::group_filter;
use taxatree_core::TreeRequest;

use super::templates;
use super::AppState;

use crate::chart::ChartData;

/// GET `/` - The viewer page.
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(templates::render_tree_page(&state.username))
}

/// Query parameters for `/api/tree`.
#[derive(Debug, Deserialize)]
pub struct TreeQuery {
    /// Taxonomic group name, or absent/"all" for everything.
    #[serde(default)]
    pub group: Option<String>,

    /// Skip the cache and refetch from the API.
    #[serde(default)]
    pub refresh: bool,
}

/// GET `/api/tree` - Returns the chart payload for the user's tree.
///
/// An empty `nodes` list is the "no observations" case, not an error;
/// the front end renders the message. Unknown groups are a 400,
/// upstream API failures a 502.
pub async fn api_tree(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TreeQuery>,
) -> Result<Json<ChartData>, (StatusCode, String)> {
    let filter = match params.group.as_deref() {
        None | Some("") => None,
        Some(name) if name.eq_ignore_ascii_case("all") => None,
        Some(name) => match group_filter(name) {
            Some(filter) => Some(filter),
            None => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    format!("unknown taxonomic group '{}'", name),
                ));
            }
        },
    };

    let request = TreeRequest {
        username: state.username.clone(),
        filter,
        refresh: params.refresh,
    };

    let outcome = state.pipeline.build(&request).await.map_err(|e| {
        error!("tree build failed: {}", e);
        (StatusCode::BAD_GATEWAY, e.to_string())
    })?;

    Ok(Json(ChartData::build(&outcome.tree, &state.layout)))
}
