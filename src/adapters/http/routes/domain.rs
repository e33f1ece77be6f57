use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};

use crate::{
    adapters::http::{app_state::AppState, origin::RequestOrigin},
    app_error::AppResult,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/domain/{domain}", get(observe_domain))
}

async fn observe_domain(
    State(app_state): State<AppState>,
    Path(domain): Path<String>,
    origin: RequestOrigin,
) -> AppResult<impl IntoResponse> {
    let view = app_state
        .observation_use_cases
        .reconcile(&domain, &origin.address, &origin.metadata)
        .await?;
    Ok(Json(view))
}
