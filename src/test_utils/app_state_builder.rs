//! Test app state builder for HTTP-level integration testing.
//!
//! This module provides `TestAppStateBuilder` which creates an `AppState` backed
//! by an `InMemoryObservationStore` and a stub observation source.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use chrono::TimeDelta;

use crate::{
    adapters::http::app_state::AppState,
    domain::entities::{domain::DomainRecord, server::ServerRecord},
    infra::config::AppConfig,
    test_utils::{InMemoryObservationStore, StubObservationSource, create_test_observation},
    use_cases::{
        observation::{DomainRepo, ObservationUseCases, ServerRepo},
        provenance::{ProvenanceRepo, ProvenanceUseCases},
    },
};

/// Builder for creating `AppState` with in-memory mocks for testing.
///
/// Forwarded headers are trusted, so tests pick the origin address with
/// `X-Forwarded-For`.
///
/// # Example
///
/// ```ignore
/// let (app_state, store) = TestAppStateBuilder::new()
///     .with_domain(create_test_domain_record(|_| {}), vec![])
///     .with_source(StubObservationSource::failing("whois unavailable"))
///     .build();
/// ```
pub struct TestAppStateBuilder {
    seed: Option<(DomainRecord, Vec<ServerRecord>)>,
    source: Option<StubObservationSource>,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self {
            seed: None,
            source: None,
        }
    }

    /// Seed the store with a known domain and its servers.
    pub fn with_domain(mut self, domain: DomainRecord, servers: Vec<ServerRecord>) -> Self {
        self.seed = Some((domain, servers));
        self
    }

    /// Replace the default source, which observes `example.com` successfully.
    pub fn with_source(mut self, source: StubObservationSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Build the state, returning the store for assertions.
    pub fn build(self) -> (AppState, Arc<InMemoryObservationStore>) {
        let store = Arc::new(match self.seed {
            Some((domain, servers)) => InMemoryObservationStore::with_domain(domain, servers),
            None => InMemoryObservationStore::new(),
        });
        let source = self
            .source
            .unwrap_or_else(|| StubObservationSource::returning(create_test_observation(|_| {})));

        let config = test_config();
        let provenance_use_cases = Arc::new(ProvenanceUseCases::new(
            store.clone() as Arc<dyn ProvenanceRepo>,
        ));
        let observation_use_cases = ObservationUseCases::new(
            store.clone() as Arc<dyn DomainRepo>,
            store.clone() as Arc<dyn ServerRepo>,
            Arc::new(source),
            provenance_use_cases.clone(),
            config.staleness_window,
        );

        let app_state = AppState {
            config: Arc::new(config),
            observation_use_cases: Arc::new(observation_use_cases),
            provenance_use_cases,
        };
        (app_state, store)
    }
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://unused".to_string(),
        db_max_connections: 1,
        bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        cors_origin: HeaderValue::from_static("http://localhost:3000"),
        trust_proxy: true,
        staleness_window: TimeDelta::seconds(3600),
        ssl_labs_url: "http://ssllabs.test/api/v3".parse().unwrap(),
        whois_root_server: "whois.test:43".to_string(),
        whois_timeout: Duration::from_secs(1),
    }
}
