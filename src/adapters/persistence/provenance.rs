use async_trait::async_trait;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::AppResult,
    domain::entities::origin::{ConnectionRecord, OriginRecord},
    use_cases::provenance::ProvenanceRepo,
};

#[async_trait]
impl ProvenanceRepo for PostgresPersistence {
    async fn origin_exists(&self, address: &str) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM origins WHERE address = $1)",
        )
        .bind(address)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn insert_origin(&self, origin: &OriginRecord) -> AppResult<()> {
        // A concurrent request may have inserted the same origin since the exists check.
        sqlx::query(
            r#"INSERT INTO origins (address, metadata, last_update)
               VALUES ($1, $2, $3)
               ON CONFLICT (address) DO NOTHING"#,
        )
        .bind(&origin.address)
        .bind(&origin.metadata)
        .bind(origin.last_update)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_connection(&self, connection: &ConnectionRecord) -> AppResult<()> {
        sqlx::query(
            r#"INSERT INTO connections (origin_ip, domain_address, last_update)
               VALUES ($1, $2, $3)"#,
        )
        .bind(&connection.origin_ip)
        .bind(&connection.domain_address)
        .bind(connection.last_update)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_domains_for_origin(&self, origin_ip: &str) -> AppResult<Vec<String>> {
        let domains = sqlx::query_scalar::<_, String>(
            r#"SELECT domain_address
               FROM connections
               WHERE origin_ip = $1
               ORDER BY last_update DESC, id DESC"#,
        )
        .bind(origin_ip)
        .fetch_all(&self.pool)
        .await?;
        Ok(domains)
    }
}
