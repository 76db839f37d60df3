use std::env;
use uuid::Uuid;

use zodiac_leads_api::core::errors::AppError;
use zodiac_leads_api::core::models::NewLead;
use zodiac_leads_api::core::zodiac;
use zodiac_leads_api::db::Database;
use zodiac_leads_api::integrations::db_storage::LeadStorage;

/// Integration smoke test for lead storage against a real Postgres.
/// Marked ignored to avoid running against production by accident; set TEST_DATABASE_URL to run.
#[tokio::test]
#[ignore]
async fn lead_storage_smoke_test() -> anyhow::Result<()> {
    let db_url = env::var("TEST_DATABASE_URL")
        .or_else(|_| env::var("DATABASE_URL"))
        .map_err(|_| anyhow::anyhow!("Set TEST_DATABASE_URL or DATABASE_URL to run this test"))?;

    let db = Database::new(&db_url).await?;
    db.ensure_schema().await?;
    let storage = LeadStorage::new(db.pool.clone());

    let sign = zodiac::resolve(1988);
    // Unique e-mail so repeated runs are easy to tell apart.
    let email = format!("smoke-{}@example.com", Uuid::new_v4().simple());
    let lead = NewLead {
        birth_year: 1988,
        name: "Smoke Test".to_string(),
        email: email.clone(),
        whatsapp: "(11) 98765-4321".to_string(),
        coupon_code: sign.coupon_code.to_string(),
        coupon_condition: Some(sign.coupon_condition.to_string()),
        zodiac_sign_name: sign.name.to_string(),
        pin: None,
    };

    let id = storage.insert_lead(&lead).await?;
    assert_ne!(id, Uuid::nil());

    let leads = storage.list_leads().await?;
    let stored = leads
        .iter()
        .find(|l| l.id == id.to_string())
        .ok_or_else(|| anyhow::anyhow!("inserted lead not listed"))?;
    assert_eq!(stored.email, email);
    assert_eq!(stored.zodiac_sign_name, "Dragão");

    storage.delete_lead(&id.to_string()).await?;
    assert!(matches!(
        storage.delete_lead(&id.to_string()).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        storage.delete_lead("not-a-uuid").await,
        Err(AppError::NotFound(_))
    ));

    Ok(())
}
