use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use serde::Serialize;

use crate::{
    adapters::http::{app_state::AppState, origin::RequestOrigin},
    app_error::AppResult,
};

#[derive(Serialize)]
struct ItemsResponse<T> {
    items: Vec<T>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/connections", get(list_connections))
}

/// Domains previously looked up from the caller's address.
async fn list_connections(
    State(app_state): State<AppState>,
    origin: RequestOrigin,
) -> AppResult<impl IntoResponse> {
    let items = app_state
        .provenance_use_cases
        .connected_domains(&origin.address)
        .await?;
    Ok(Json(ItemsResponse { items }))
}
