use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::FromRow;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::AppResult,
    domain::entities::server::ServerRecord,
    use_cases::observation::ServerRepo,
};

#[derive(FromRow)]
struct DbServer {
    domain_address: String,
    address: String,
    ssl_grade: String,
    country: String,
    owner: String,
    last_update: NaiveDateTime,
}

impl From<DbServer> for ServerRecord {
    fn from(db: DbServer) -> Self {
        ServerRecord {
            domain_address: db.domain_address,
            address: db.address,
            ssl_grade: db.ssl_grade,
            country: db.country,
            owner: db.owner,
            last_update: db.last_update,
        }
    }
}

#[async_trait]
impl ServerRepo for PostgresPersistence {
    async fn server_exists(&self, domain_address: &str, address: &str) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM servers WHERE domain_address = $1 AND address = $2)",
        )
        .bind(domain_address)
        .bind(address)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn insert_server(&self, server: &ServerRecord) -> AppResult<()> {
        sqlx::query(
            r#"INSERT INTO servers (domain_address, address, ssl_grade, country, owner, last_update)
               VALUES ($1, $2, $3, $4, $5, $6)
               ON CONFLICT (domain_address, address) DO UPDATE
               SET ssl_grade = EXCLUDED.ssl_grade,
                   country = EXCLUDED.country,
                   owner = EXCLUDED.owner,
                   last_update = EXCLUDED.last_update"#,
        )
        .bind(&server.domain_address)
        .bind(&server.address)
        .bind(&server.ssl_grade)
        .bind(&server.country)
        .bind(&server.owner)
        .bind(server.last_update)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_server(&self, server: &ServerRecord) -> AppResult<Option<ServerRecord>> {
        // Self-join on a locked snapshot so RETURNING yields the pre-update values.
        let previous = sqlx::query_as::<_, DbServer>(
            r#"UPDATE servers AS s
               SET ssl_grade = $3, country = $4, owner = $5, last_update = $6
               FROM (
                    SELECT domain_address, address, ssl_grade, country, owner, last_update
                    FROM servers
                    WHERE domain_address = $1 AND address = $2
                    FOR UPDATE
               ) AS prev
               WHERE s.domain_address = prev.domain_address AND s.address = prev.address
               RETURNING prev.domain_address, prev.address, prev.ssl_grade, prev.country, prev.owner, prev.last_update"#,
        )
        .bind(&server.domain_address)
        .bind(&server.address)
        .bind(&server.ssl_grade)
        .bind(&server.country)
        .bind(&server.owner)
        .bind(server.last_update)
        .fetch_optional(&self.pool)
        .await?;
        Ok(previous.map(ServerRecord::from))
    }
}
