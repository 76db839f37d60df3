use sqlx::{postgres::PgPoolOptions, PgPool};

/// Bundled schema for the `leads` table.
pub const CREATE_LEADS_SQL: &str = include_str!("../migrations/0001_create_leads.sql");

pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        sqlx::query("SELECT 1").execute(&pool).await?;

        Ok(Self { pool })
    }

    /// Creates the `leads` table when it does not exist yet.
    pub async fn ensure_schema(&self) -> anyhow::Result<()> {
        sqlx::raw_sql(CREATE_LEADS_SQL).execute(&self.pool).await?;
        tracing::info!("Leads schema ready");
        Ok(())
    }
}
