//! Minimal whois (RFC 3912) client.
//!
//! A query goes to the root server first; when its answer carries a `refer:`
//! line the query is repeated against that registry server.

use std::collections::HashMap;
use std::time::Duration;

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
};
use tracing::debug;

use crate::app_error::{AppError, AppResult};

const WHOIS_PORT: u16 = 43;

/// Largest answer read from a whois server; anything past it is dropped.
const MAX_WHOIS_BYTES: u64 = 64 * 1024;

/// Status words that mean the registration is not serving.
const INACTIVE_STATUSES: &[&str] = &[
    "inactive",
    "clienthold",
    "serverhold",
    "pendingdelete",
    "redemptionperiod",
    "pendingrestore",
];

#[derive(Clone)]
pub struct WhoisClient {
    root_server: String,
    timeout: Duration,
}

impl WhoisClient {
    pub fn new(root_server: String, timeout: Duration) -> Self {
        Self {
            root_server,
            timeout,
        }
    }

    pub async fn lookup(&self, domain: &str) -> AppResult<WhoisRecord> {
        let root = WhoisRecord::parse(&self.query(&self.root_server, domain).await?);

        match root.first("refer") {
            Some(registry) => {
                debug!(domain = %domain, registry = %registry, "Following whois referral");
                let raw = self.query(&referral_server(registry), domain).await?;
                Ok(WhoisRecord::parse(&raw))
            }
            None => Ok(root),
        }
    }

    async fn query(&self, server: &str, query: &str) -> AppResult<String> {
        let exchange = async {
            let mut stream = TcpStream::connect(server).await?;
            stream.write_all(format!("{}\r\n", query).as_bytes()).await?;
            let mut raw = Vec::new();
            stream.take(MAX_WHOIS_BYTES).read_to_end(&mut raw).await?;
            Ok::<_, std::io::Error>(String::from_utf8_lossy(&raw).into_owned())
        };

        tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| AppError::UpstreamLookup(format!("whois query to {} timed out", server)))?
            .map_err(|e| AppError::UpstreamLookup(format!("whois query to {} failed: {}", server, e)))
    }
}

/// `refer:` values are bare host names; an explicit port is kept as given.
fn referral_server(registry: &str) -> String {
    if registry.contains(':') {
        registry.to_string()
    } else {
        format!("{}:{}", registry, WHOIS_PORT)
    }
}

/// Parsed `Key: Value` lines of a whois answer. Keys are matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct WhoisRecord {
    fields: HashMap<String, Vec<String>>,
}

impl WhoisRecord {
    pub fn parse(raw: &str) -> Self {
        let mut fields: HashMap<String, Vec<String>> = HashMap::new();

        for line in raw.lines() {
            let line = line.trim();
            // Comments (`%`, `#`) and notices (`>>> Last update ... <<<`)
            if line.is_empty()
                || line.starts_with('%')
                || line.starts_with('#')
                || line.starts_with(">>>")
            {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            fields
                .entry(key.trim().to_lowercase())
                .or_default()
                .push(value.to_string());
        }

        Self { fields }
    }

    pub fn first(&self, key: &str) -> Option<&str> {
        self.all(key).first().map(String::as_str)
    }

    pub fn all(&self, key: &str) -> &[String] {
        self.fields
            .get(&key.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Registered name, lowercased. `None` means the lookup found no registration.
    pub fn domain_name(&self) -> Option<String> {
        self.first("Domain Name").map(str::to_lowercase)
    }

    /// Active when at least one status is reported and none of them is a hold,
    /// pending deletion, redemption or inactive state.
    pub fn is_active(&self) -> bool {
        let statuses: Vec<&String> = self
            .all("Domain Status")
            .iter()
            .chain(self.all("status"))
            .collect();

        !statuses.is_empty()
            && statuses.iter().all(|status| {
                let word = status
                    .split_whitespace()
                    .next()
                    .unwrap_or_default()
                    .to_lowercase();
                !INACTIVE_STATUSES.contains(&word.as_str())
            })
    }

    pub fn registrant_country(&self) -> String {
        self.first("Registrant Country").unwrap_or_default().to_string()
    }

    pub fn registrant_organization(&self) -> String {
        self.first("Registrant Organization")
            .unwrap_or_default()
            .to_string()
    }
}
