use chrono::NaiveDateTime;

/// A requester address, recorded once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginRecord {
    pub address: String,
    pub metadata: String,
    pub last_update: NaiveDateTime,
}

/// One lookup of `domain_address` by `origin_ip`. Never deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionRecord {
    pub origin_ip: String,
    pub domain_address: String,
    pub last_update: NaiveDateTime,
}
