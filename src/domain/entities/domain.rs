use chrono::NaiveDateTime;

/// A domain row as persisted. `logo` is empty when the page advertises no icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainRecord {
    pub address: String,
    pub is_down: bool,
    pub logo: String,
    pub ssl_grade: String,
    pub title: String,
    pub last_update: NaiveDateTime,
}
