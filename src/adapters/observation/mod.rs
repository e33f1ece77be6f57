//! Live observation source: whois for registration and liveness, SSL Labs for
//! endpoints and grades, the landing page for title and logo.

pub mod page_meta;
pub mod ssl_labs;
pub mod whois;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, instrument};
use url::Url;

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::server::ServerSnapshot,
    use_cases::observation::{Observation, ObservationSource},
};

use self::{page_meta::PageMetadataClient, ssl_labs::SslLabsClient, whois::WhoisClient};

#[derive(Clone)]
pub struct LiveObservationSource {
    whois: WhoisClient,
    ssl_labs: SslLabsClient,
    pages: PageMetadataClient,
}

impl LiveObservationSource {
    pub fn new(
        http: Client,
        ssl_labs_url: Url,
        whois_root_server: String,
        whois_timeout: Duration,
    ) -> Self {
        Self {
            whois: WhoisClient::new(whois_root_server, whois_timeout),
            ssl_labs: SslLabsClient::new(http.clone(), ssl_labs_url),
            pages: PageMetadataClient::new(http),
        }
    }
}

#[async_trait]
impl ObservationSource for LiveObservationSource {
    #[instrument(skip(self))]
    async fn fetch(&self, domain_name: &str) -> AppResult<Observation> {
        let registration = self.whois.lookup(domain_name).await?;
        let address = registration.domain_name().ok_or_else(|| {
            AppError::UpstreamLookup(format!("No registration found for {}", domain_name))
        })?;

        let endpoints = self.ssl_labs.analyze(&address).await?;
        let country = registration.registrant_country();
        let owner = registration.registrant_organization();
        let servers = endpoints
            .into_iter()
            .map(|endpoint| ServerSnapshot {
                address: endpoint.address,
                ssl_grade: endpoint.grade,
                country: country.clone(),
                owner: owner.clone(),
            })
            .collect::<Vec<_>>();

        let page = self.pages.fetch(&address).await?;

        info!(
            domain = %address,
            servers = servers.len(),
            "Observed domain"
        );

        Ok(Observation {
            is_down: !registration.is_active(),
            address,
            title: page.title,
            logo: page.logo,
            servers,
        })
    }
}
