use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::FromRow;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::AppResult,
    domain::entities::domain::DomainRecord,
    use_cases::observation::DomainRepo,
};

#[derive(FromRow)]
struct DbDomain {
    address: String,
    is_down: bool,
    logo: String,
    ssl_grade: String,
    title: String,
    last_update: NaiveDateTime,
}

impl From<DbDomain> for DomainRecord {
    fn from(db: DbDomain) -> Self {
        DomainRecord {
            address: db.address,
            is_down: db.is_down,
            logo: db.logo,
            ssl_grade: db.ssl_grade,
            title: db.title,
            last_update: db.last_update,
        }
    }
}

#[async_trait]
impl DomainRepo for PostgresPersistence {
    async fn domain_exists(&self, address: &str) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM domains WHERE address = $1)",
        )
        .bind(address)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn get_domain(&self, address: &str) -> AppResult<Option<DomainRecord>> {
        let rec = sqlx::query_as::<_, DbDomain>(
            "SELECT address, is_down, logo, ssl_grade, title, last_update FROM domains WHERE address = $1",
        )
        .bind(address)
        .fetch_optional(&self.pool)
        .await?;
        Ok(rec.map(DomainRecord::from))
    }

    async fn insert_domain(&self, domain: &DomainRecord) -> AppResult<()> {
        // A concurrent first observation may have inserted the row since the exists check.
        sqlx::query(
            r#"INSERT INTO domains (address, is_down, logo, ssl_grade, title, last_update)
               VALUES ($1, $2, $3, $4, $5, $6)
               ON CONFLICT (address) DO UPDATE
               SET is_down = EXCLUDED.is_down,
                   logo = EXCLUDED.logo,
                   ssl_grade = EXCLUDED.ssl_grade,
                   title = EXCLUDED.title,
                   last_update = EXCLUDED.last_update"#,
        )
        .bind(&domain.address)
        .bind(domain.is_down)
        .bind(&domain.logo)
        .bind(&domain.ssl_grade)
        .bind(&domain.title)
        .bind(domain.last_update)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_domain(&self, domain: &DomainRecord) -> AppResult<()> {
        sqlx::query(
            r#"UPDATE domains
               SET is_down = $2, logo = $3, ssl_grade = $4, title = $5, last_update = $6
               WHERE address = $1"#,
        )
        .bind(&domain.address)
        .bind(domain.is_down)
        .bind(&domain.logo)
        .bind(&domain.ssl_grade)
        .bind(&domain.title)
        .bind(domain.last_update)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
