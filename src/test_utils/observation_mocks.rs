//! In-memory mock implementations for the observation store and source.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::{
        domain::DomainRecord,
        origin::{ConnectionRecord, OriginRecord},
        server::ServerRecord,
    },
    use_cases::{
        observation::{DomainRepo, Observation, ObservationSource, ServerRepo},
        provenance::ProvenanceRepo,
    },
};

/// In-memory implementation of every store port, in insertion order.
///
/// Inserts upsert on the primary key, like the Postgres adapter.
#[derive(Default)]
pub struct InMemoryObservationStore {
    domains: Mutex<Vec<DomainRecord>>,
    servers: Mutex<Vec<ServerRecord>>,
    origins: Mutex<Vec<OriginRecord>>,
    connections: Mutex<Vec<ConnectionRecord>>,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
    stale_exists_checks: AtomicBool,
}

impl InMemoryObservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with one domain and its servers.
    pub fn with_domain(domain: DomainRecord, servers: Vec<ServerRecord>) -> Self {
        Self {
            domains: Mutex::new(vec![domain]),
            servers: Mutex::new(servers),
            ..Self::default()
        }
    }

    /// Make every subsequent write fail as if the database were unreachable.
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    /// Make domain and server exists checks answer `false`, as they do for a request
    /// that checked before a concurrent first observation committed.
    pub fn stale_exists_checks(&self) {
        self.stale_exists_checks.store(true, Ordering::SeqCst);
    }

    /// Number of successful inserts and updates across all tables.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn domains(&self) -> Vec<DomainRecord> {
        self.domains.lock().unwrap().clone()
    }

    pub fn servers(&self) -> Vec<ServerRecord> {
        self.servers.lock().unwrap().clone()
    }

    pub fn origins(&self) -> Vec<OriginRecord> {
        self.origins.lock().unwrap().clone()
    }

    pub fn connections(&self) -> Vec<ConnectionRecord> {
        self.connections.lock().unwrap().clone()
    }

    fn begin_write(&self) -> AppResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Database("Database operation failed".into()));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl DomainRepo for InMemoryObservationStore {
    async fn domain_exists(&self, address: &str) -> AppResult<bool> {
        if self.stale_exists_checks.load(Ordering::SeqCst) {
            return Ok(false);
        }
        Ok(self
            .domains
            .lock()
            .unwrap()
            .iter()
            .any(|d| d.address == address))
    }

    async fn get_domain(&self, address: &str) -> AppResult<Option<DomainRecord>> {
        Ok(self
            .domains
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.address == address)
            .cloned())
    }

    async fn insert_domain(&self, domain: &DomainRecord) -> AppResult<()> {
        self.begin_write()?;
        let mut domains = self.domains.lock().unwrap();
        match domains.iter_mut().find(|d| d.address == domain.address) {
            Some(stored) => *stored = domain.clone(),
            None => domains.push(domain.clone()),
        }
        Ok(())
    }

    async fn update_domain(&self, domain: &DomainRecord) -> AppResult<()> {
        self.begin_write()?;
        let mut domains = self.domains.lock().unwrap();
        let stored = domains
            .iter_mut()
            .find(|d| d.address == domain.address)
            .ok_or(AppError::NotFound)?;
        *stored = domain.clone();
        Ok(())
    }
}

#[async_trait]
impl ServerRepo for InMemoryObservationStore {
    async fn server_exists(&self, domain_address: &str, address: &str) -> AppResult<bool> {
        if self.stale_exists_checks.load(Ordering::SeqCst) {
            return Ok(false);
        }
        Ok(self
            .servers
            .lock()
            .unwrap()
            .iter()
            .any(|s| s.domain_address == domain_address && s.address == address))
    }

    async fn insert_server(&self, server: &ServerRecord) -> AppResult<()> {
        self.begin_write()?;
        let mut servers = self.servers.lock().unwrap();
        match servers
            .iter_mut()
            .find(|s| s.domain_address == server.domain_address && s.address == server.address)
        {
            Some(stored) => *stored = server.clone(),
            None => servers.push(server.clone()),
        }
        Ok(())
    }

    async fn update_server(&self, server: &ServerRecord) -> AppResult<Option<ServerRecord>> {
        self.begin_write()?;
        let mut servers = self.servers.lock().unwrap();
        let Some(stored) = servers
            .iter_mut()
            .find(|s| s.domain_address == server.domain_address && s.address == server.address)
        else {
            return Ok(None);
        };
        Ok(Some(std::mem::replace(stored, server.clone())))
    }
}

#[async_trait]
impl ProvenanceRepo for InMemoryObservationStore {
    async fn origin_exists(&self, address: &str) -> AppResult<bool> {
        Ok(self
            .origins
            .lock()
            .unwrap()
            .iter()
            .any(|o| o.address == address))
    }

    async fn insert_origin(&self, origin: &OriginRecord) -> AppResult<()> {
        self.begin_write()?;
        let mut origins = self.origins.lock().unwrap();
        if !origins.iter().any(|o| o.address == origin.address) {
            origins.push(origin.clone());
        }
        Ok(())
    }

    async fn insert_connection(&self, connection: &ConnectionRecord) -> AppResult<()> {
        self.begin_write()?;
        self.connections.lock().unwrap().push(connection.clone());
        Ok(())
    }

    async fn list_domains_for_origin(&self, origin_ip: &str) -> AppResult<Vec<String>> {
        Ok(self
            .connections
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|c| c.origin_ip == origin_ip)
            .map(|c| c.domain_address.clone())
            .collect())
    }
}

/// Observation source that returns a fixed result and counts calls.
pub struct StubObservationSource {
    result: Result<Observation, String>,
    calls: Arc<AtomicUsize>,
}

impl StubObservationSource {
    pub fn returning(observation: Observation) -> Self {
        Self {
            result: Ok(observation),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl ObservationSource for StubObservationSource {
    async fn fetch(&self, _domain_name: &str) -> AppResult<Observation> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.result {
            Ok(observation) => Ok(observation.clone()),
            Err(message) => Err(AppError::UpstreamLookup(message.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_domain_record, create_test_server, test_now};

    #[tokio::test]
    async fn test_update_server_returns_previous_row() {
        let original = create_test_server(|_| {}).into_record("example.com", test_now());
        let store = InMemoryObservationStore::with_domain(
            create_test_domain_record(|_| {}),
            vec![original.clone()],
        );

        let mut replacement = original.clone();
        replacement.owner = "Replacement".to_string();
        let previous = store.update_server(&replacement).await.unwrap();

        assert_eq!(previous, Some(original));
        assert_eq!(store.servers()[0].owner, "Replacement");
    }

    #[tokio::test]
    async fn test_servers_are_scoped_by_domain() {
        let server = create_test_server(|_| {}).into_record("example.com", test_now());
        let store =
            InMemoryObservationStore::with_domain(create_test_domain_record(|_| {}), vec![server]);

        assert!(store.server_exists("example.com", "192.0.2.1").await.unwrap());
        assert!(!store.server_exists("example.org", "192.0.2.1").await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_domain_overwrites_existing_row() {
        let store =
            InMemoryObservationStore::with_domain(create_test_domain_record(|_| {}), vec![]);

        store
            .insert_domain(&create_test_domain_record(|d| d.title = "Replaced".to_string()))
            .await
            .unwrap();

        assert_eq!(store.domains().len(), 1);
        assert_eq!(store.domains()[0].title, "Replaced");
    }

    #[tokio::test]
    async fn test_failing_writes_are_not_counted() {
        let store = InMemoryObservationStore::new();
        store.fail_writes();

        let result = store.insert_domain(&create_test_domain_record(|_| {})).await;

        assert!(matches!(result, Err(AppError::Database(_))));
        assert_eq!(store.write_count(), 0);
        assert!(store.domains().is_empty());
    }
}
