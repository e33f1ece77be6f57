use chrono::NaiveDateTime;
use serde::Serialize;

/// A TLS endpoint as seen in one observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerSnapshot {
    pub address: String,
    pub ssl_grade: String,
    pub country: String,
    pub owner: String,
}

/// A server row as persisted under its parent domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerRecord {
    pub domain_address: String,
    pub address: String,
    pub ssl_grade: String,
    pub country: String,
    pub owner: String,
    pub last_update: NaiveDateTime,
}

impl ServerSnapshot {
    /// Whether country, owner or grade differ from what is stored.
    pub fn differs_from(&self, stored: &ServerRecord) -> bool {
        self.country != stored.country
            || self.owner != stored.owner
            || self.ssl_grade != stored.ssl_grade
    }

    pub fn into_record(self, domain_address: &str, last_update: NaiveDateTime) -> ServerRecord {
        ServerRecord {
            domain_address: domain_address.to_string(),
            address: self.address,
            ssl_grade: self.ssl_grade,
            country: self.country,
            owner: self.owner,
            last_update,
        }
    }
}
