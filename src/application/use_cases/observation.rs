use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDateTime, TimeDelta, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::{
    app_error::AppResult,
    application::helpers::{
        domain_name::normalize_domain_name,
        snapshot::{is_stale, server_changed},
    },
    domain::entities::{
        domain::DomainRecord,
        server::{ServerRecord, ServerSnapshot},
        ssl_grade,
    },
    use_cases::provenance::ProvenanceUseCases,
};

/// Raw snapshot of a domain as produced by an [`ObservationSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub address: String,
    pub is_down: bool,
    pub title: String,
    pub logo: String,
    pub servers: Vec<ServerSnapshot>,
}

/// A reconciled domain together with the servers seen in this observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainView {
    pub address: String,
    pub is_down: bool,
    pub logo: String,
    pub previous_ssl_grade: String,
    pub servers: Vec<ServerSnapshot>,
    pub servers_changed: bool,
    pub ssl_grade: String,
    pub title: String,
}

#[async_trait]
pub trait ObservationSource: Send + Sync {
    /// Fails with `AppError::UpstreamLookup` when the domain cannot be resolved or graded.
    async fn fetch(&self, domain_name: &str) -> AppResult<Observation>;
}

#[async_trait]
pub trait DomainRepo: Send + Sync {
    async fn domain_exists(&self, address: &str) -> AppResult<bool>;
    async fn get_domain(&self, address: &str) -> AppResult<Option<DomainRecord>>;
    async fn insert_domain(&self, domain: &DomainRecord) -> AppResult<()>;
    async fn update_domain(&self, domain: &DomainRecord) -> AppResult<()>;
}

#[async_trait]
pub trait ServerRepo: Send + Sync {
    async fn server_exists(&self, domain_address: &str, address: &str) -> AppResult<bool>;
    async fn insert_server(&self, server: &ServerRecord) -> AppResult<()>;
    /// Overwrite the stored row and return what it held before, `None` if it vanished.
    async fn update_server(&self, server: &ServerRecord) -> AppResult<Option<ServerRecord>>;
}

#[derive(Clone)]
pub struct ObservationUseCases {
    domain_repo: Arc<dyn DomainRepo>,
    server_repo: Arc<dyn ServerRepo>,
    source: Arc<dyn ObservationSource>,
    provenance: Arc<ProvenanceUseCases>,
    staleness_window: TimeDelta,
}

impl ObservationUseCases {
    pub fn new(
        domain_repo: Arc<dyn DomainRepo>,
        server_repo: Arc<dyn ServerRepo>,
        source: Arc<dyn ObservationSource>,
        provenance: Arc<ProvenanceUseCases>,
        staleness_window: TimeDelta,
    ) -> Self {
        Self {
            domain_repo,
            server_repo,
            source,
            provenance,
            staleness_window,
        }
    }

    /// Observe `domain_name` and fold the result into the store.
    ///
    /// Nothing is written when the upstream observation fails. Store failures
    /// abort the sequence where they happen; earlier writes are kept.
    #[instrument(skip(self, metadata))]
    pub async fn reconcile(
        &self,
        domain_name: &str,
        origin_address: &str,
        metadata: &str,
    ) -> AppResult<DomainView> {
        let domain_name = normalize_domain_name(domain_name)?;
        let observation = self.source.fetch(&domain_name).await?;
        let now = Utc::now().naive_utc();

        let view = if self.domain_repo.domain_exists(&observation.address).await? {
            self.update_known(observation, now).await?
        } else {
            self.insert_new(observation, now).await?
        };

        self.provenance
            .record(origin_address, &view.address, metadata)
            .await?;

        Ok(view)
    }

    async fn insert_new(
        &self,
        observation: Observation,
        now: NaiveDateTime,
    ) -> AppResult<DomainView> {
        let record = DomainRecord {
            address: observation.address,
            is_down: observation.is_down,
            logo: observation.logo,
            ssl_grade: aggregate_grade(&observation.servers),
            title: observation.title,
            last_update: now,
        };
        self.domain_repo.insert_domain(&record).await?;

        for server in &observation.servers {
            self.server_repo
                .insert_server(&server.clone().into_record(&record.address, now))
                .await?;
        }

        info!(
            domain = %record.address,
            servers = observation.servers.len(),
            ssl_grade = %record.ssl_grade,
            "Recorded new domain"
        );

        Ok(view_of(record, observation.servers, String::new(), false))
    }

    async fn update_known(
        &self,
        observation: Observation,
        now: NaiveDateTime,
    ) -> AppResult<DomainView> {
        let address = observation.address;
        let mut servers_changed = false;

        for server in &observation.servers {
            let record = server.clone().into_record(&address, now);
            if self.server_repo.server_exists(&address, &server.address).await? {
                if let Some(previous) = self.server_repo.update_server(&record).await? {
                    let changed = server_changed(server, &previous, now, self.staleness_window);
                    if changed {
                        debug!(domain = %address, server = %server.address, "Server changed");
                    }
                    servers_changed |= changed;
                }
            } else {
                self.server_repo.insert_server(&record).await?;
            }
        }

        let previous_ssl_grade = match self.domain_repo.get_domain(&address).await? {
            Some(stored) if is_stale(stored.last_update, now, self.staleness_window) => {
                stored.ssl_grade
            }
            _ => String::new(),
        };

        let record = DomainRecord {
            address,
            is_down: observation.is_down,
            logo: observation.logo,
            ssl_grade: aggregate_grade(&observation.servers),
            title: observation.title,
            last_update: now,
        };
        self.domain_repo.update_domain(&record).await?;

        info!(
            domain = %record.address,
            ssl_grade = %record.ssl_grade,
            previous_ssl_grade = %previous_ssl_grade,
            servers_changed,
            "Updated known domain"
        );

        Ok(view_of(
            record,
            observation.servers,
            previous_ssl_grade,
            servers_changed,
        ))
    }
}

fn aggregate_grade(servers: &[ServerSnapshot]) -> String {
    ssl_grade::aggregate(servers.iter().map(|s| s.ssl_grade.as_str()))
        .as_str()
        .to_string()
}

fn view_of(
    record: DomainRecord,
    servers: Vec<ServerSnapshot>,
    previous_ssl_grade: String,
    servers_changed: bool,
) -> DomainView {
    DomainView {
        address: record.address,
        is_down: record.is_down,
        logo: record.logo,
        previous_ssl_grade,
        servers,
        servers_changed,
        ssl_grade: record.ssl_grade,
        title: record.title,
    }
}
