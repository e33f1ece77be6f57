use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, instrument};

use crate::{
    app_error::AppResult,
    domain::entities::origin::{ConnectionRecord, OriginRecord},
};

#[async_trait]
pub trait ProvenanceRepo: Send + Sync {
    async fn origin_exists(&self, address: &str) -> AppResult<bool>;
    async fn insert_origin(&self, origin: &OriginRecord) -> AppResult<()>;
    async fn insert_connection(&self, connection: &ConnectionRecord) -> AppResult<()>;
    /// Domain addresses looked up by `origin_ip`, newest first, one entry per connection.
    async fn list_domains_for_origin(&self, origin_ip: &str) -> AppResult<Vec<String>>;
}

/// Records who looked up which domain. Origins are deduplicated, connections are not.
#[derive(Clone)]
pub struct ProvenanceUseCases {
    repo: Arc<dyn ProvenanceRepo>,
}

impl ProvenanceUseCases {
    pub fn new(repo: Arc<dyn ProvenanceRepo>) -> Self {
        Self { repo }
    }

    pub async fn exists(&self, origin_address: &str) -> AppResult<bool> {
        self.repo.origin_exists(origin_address).await
    }

    #[instrument(skip(self, metadata))]
    pub async fn record(
        &self,
        origin_address: &str,
        domain_address: &str,
        metadata: &str,
    ) -> AppResult<()> {
        let now = Utc::now().naive_utc();

        if !self.exists(origin_address).await? {
            debug!(origin = %origin_address, "Recording new origin");
            self.repo
                .insert_origin(&OriginRecord {
                    address: origin_address.to_string(),
                    metadata: metadata.to_string(),
                    last_update: now,
                })
                .await?;
        }

        self.repo
            .insert_connection(&ConnectionRecord {
                origin_ip: origin_address.to_string(),
                domain_address: domain_address.to_string(),
                last_update: now,
            })
            .await
    }

    pub async fn connected_domains(&self, origin_address: &str) -> AppResult<Vec<String>> {
        self.repo.list_domains_for_origin(origin_address).await
    }
}
