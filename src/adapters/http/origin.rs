use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};

use crate::{adapters::http::app_state::AppState, app_error::AppError};

/// The requester of an observation: its network address plus free-form metadata.
#[derive(Debug, Clone)]
pub struct RequestOrigin {
    pub address: String,
    pub metadata: String,
}

impl FromRequestParts<AppState> for RequestOrigin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        app_state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());

        // Only trust forwarded headers if explicitly configured (when behind a reverse proxy)
        let forwarded = if app_state.config.trust_proxy {
            forwarded_ip(&parts.headers)
        } else {
            None
        };

        tracing::debug!(
            trust_proxy = app_state.config.trust_proxy,
            connect_ip = ?peer,
            forwarded_ip = ?forwarded,
            "Resolving request origin"
        );

        let address = forwarded
            .or(peer)
            .ok_or_else(|| AppError::Internal("peer address unavailable".into()))?;

        let metadata = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        Ok(RequestOrigin { address, metadata })
    }
}

fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    // Extract IP from X-Forwarded-For or X-Real-IP headers
    if let Some(forwarded) = headers.get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
        && let Some(first) = val.split(',').next()
    {
        let trimmed = first.trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
    }
    if let Some(real) = headers.get("x-real-ip")
        && let Ok(val) = real.to_str()
        && !val.trim().is_empty()
    {
        return Some(val.trim().to_string());
    }
    None
}
