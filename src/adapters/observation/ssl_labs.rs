use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::app_error::{AppError, AppResult};

/// One endpoint of an SSL Labs assessment. `grade` is empty until graded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradedEndpoint {
    pub address: String,
    pub grade: String,
}

#[derive(Clone)]
pub struct SslLabsClient {
    client: Client,
    base_url: Url,
}

#[derive(Deserialize)]
struct AnalyzeResponse {
    status: Option<String>,
    #[serde(rename = "statusMessage")]
    status_message: Option<String>,
    #[serde(default)]
    endpoints: Vec<EndpointResponse>,
}

#[derive(Deserialize)]
struct EndpointResponse {
    #[serde(rename = "ipAddress")]
    ip_address: String,
    grade: Option<String>,
}

impl SslLabsClient {
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub async fn analyze(&self, domain: &str) -> AppResult<Vec<GradedEndpoint>> {
        let url = analyze_url(&self.base_url, domain);

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::UpstreamLookup(format!("SSL Labs request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| AppError::UpstreamLookup(format!("SSL Labs rejected request: {}", e)))?;

        let parsed: AnalyzeResponse = resp
            .json()
            .await
            .map_err(|e| AppError::UpstreamLookup(format!("SSL Labs response malformed: {}", e)))?;

        debug!(
            domain = %domain,
            status = ?parsed.status,
            endpoints = parsed.endpoints.len(),
            "SSL Labs assessment"
        );

        endpoints_from_response(parsed)
    }
}

fn analyze_url(base_url: &Url, domain: &str) -> Url {
    let mut url = base_url.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push("analyze");
    }
    url.query_pairs_mut().append_pair("host", domain);
    url
}

/// Endpoints in response order, first occurrence of each address only.
fn endpoints_from_response(resp: AnalyzeResponse) -> AppResult<Vec<GradedEndpoint>> {
    if resp.status.as_deref() == Some("ERROR") {
        return Err(AppError::UpstreamLookup(format!(
            "SSL Labs could not assess host: {}",
            resp.status_message.unwrap_or_default()
        )));
    }

    let mut endpoints: Vec<GradedEndpoint> = Vec::with_capacity(resp.endpoints.len());
    for endpoint in resp.endpoints {
        if endpoints.iter().any(|e| e.address == endpoint.ip_address) {
            continue;
        }
        endpoints.push(GradedEndpoint {
            address: endpoint.ip_address,
            grade: endpoint.grade.unwrap_or_default(),
        });
    }
    Ok(endpoints)
}
