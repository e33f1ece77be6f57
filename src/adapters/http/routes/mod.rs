pub mod connection;
pub mod domain;

use axum::{Router, routing::get};

use crate::adapters::http::app_state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .merge(domain::router())
        .merge(connection::router())
}

async fn index() -> &'static str {
    "Welcome to domainscope!\n"
}
