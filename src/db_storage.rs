use crate::errors::{AppError, ResultExt};
use crate::models::{Lead, NewLead};
use sqlx::PgPool;
use uuid::Uuid;

const LEAD_COLUMNS: &str = r#"
    id::text AS id,
    birth_year,
    name,
    email,
    whatsapp,
    coupon_code,
    coupon_condition,
    zodiac_sign_name,
    pin,
    created_at
"#;

/// Lead rows stored directly in Postgres (`public.leads`).
#[derive(Clone)]
pub struct LeadStorage {
    pool: PgPool,
}

impl LeadStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a lead and returns the id assigned by the database.
    pub async fn insert_lead(&self, lead: &NewLead) -> Result<Uuid, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO leads (
                birth_year,
                name,
                email,
                whatsapp,
                coupon_code,
                coupon_condition,
                zodiac_sign_name,
                pin
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(lead.birth_year)
        .bind(&lead.name)
        .bind(&lead.email)
        .bind(&lead.whatsapp)
        .bind(&lead.coupon_code)
        .bind(&lead.coupon_condition)
        .bind(&lead.zodiac_sign_name)
        .bind(&lead.pin)
        .fetch_one(&self.pool)
        .await
        .context("inserting lead")?;

        tracing::info!("✓ Lead {} stored ({})", id, lead.zodiac_sign_name);
        Ok(id)
    }

    /// All leads, newest first.
    pub async fn list_leads(&self) -> Result<Vec<Lead>, AppError> {
        let query = format!("SELECT {} FROM leads ORDER BY created_at DESC", LEAD_COLUMNS);
        let leads = sqlx::query_as::<_, Lead>(&query)
            .fetch_all(&self.pool)
            .await
            .context("listing leads")?;

        tracing::debug!("Fetched {} leads", leads.len());
        Ok(leads)
    }

    /// Deletes one lead. Ids that are not UUIDs cannot exist and report not found.
    pub async fn delete_lead(&self, id: &str) -> Result<(), AppError> {
        let Ok(uuid) = Uuid::parse_str(id) else {
            return Err(AppError::NotFound(format!("Lead {} not found", id)));
        };

        let result = sqlx::query("DELETE FROM leads WHERE id = $1")
            .bind(uuid)
            .execute(&self.pool)
            .await
            .context("deleting lead")?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Lead {} not found", id)));
        }

        tracing::info!("✓ Lead {} deleted", id);
        Ok(())
    }
}
