//! Writes captured leads to `leads-<date>.csv` using the configured backend.
//!
//! Usage: `export_leads [--columns email,name] [--out DIR]` (see `--help`)
//!
//! Signs in with `ADMIN_EMAIL` / `ADMIN_PASSWORD` like the dashboard does.

use chrono::Utc;
use clap::Parser;
use std::env;
use std::path::PathBuf;

use zodiac_leads_api::config::Config;
use zodiac_leads_api::core::csv_export::{self, parse_columns};
use zodiac_leads_api::integrations::backend::LeadBackend;

#[derive(Parser, Debug)]
#[command(name = "export_leads")]
#[command(about = "Export captured leads as a UTF-8 CSV file")]
#[command(version)]
struct Args {
    /// Comma-separated column keys (e.g. `email,name`); all columns when omitted
    #[arg(long)]
    columns: Option<String>,

    /// Directory the CSV file is written to
    #[arg(long = "out", default_value = ".")]
    out_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = Config::from_env()?;
    let columns = parse_columns(args.columns.as_deref())?;
    let offset = config
        .display_offset()
        .ok_or_else(|| anyhow::anyhow!("Invalid DISPLAY_UTC_OFFSET_HOURS"))?;

    let email = env::var("ADMIN_EMAIL").map_err(|_| anyhow::anyhow!("ADMIN_EMAIL must be set"))?;
    let password =
        env::var("ADMIN_PASSWORD").map_err(|_| anyhow::anyhow!("ADMIN_PASSWORD must be set"))?;

    let backend = LeadBackend::from_config(&config).await?;
    let session = backend.sign_in(&email, &password).await?;
    let leads = backend.list_leads(&session).await?;

    let path = args
        .out_dir
        .join(csv_export::export_filename(Utc::now().date_naive()));
    let body = csv_export::with_bom(&csv_export::export(&leads, &columns, &offset));
    tokio::fs::write(&path, body).await?;

    if let Err(e) = backend.sign_out(&session.access_token).await {
        tracing::warn!("Sign-out after export failed: {}", e);
    }

    tracing::info!("Exported {} leads to {}", leads.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["export_leads"]).unwrap();
        assert_eq!(args.columns, None);
        assert_eq!(args.out_dir, PathBuf::from("."));
    }

    #[test]
    fn test_args_flags() {
        let args =
            Args::try_parse_from(["export_leads", "--columns", "email,name", "--out", "/tmp/leads"])
                .unwrap();
        assert_eq!(args.columns.as_deref(), Some("email,name"));
        assert_eq!(args.out_dir, PathBuf::from("/tmp/leads"));
    }

    #[test]
    fn test_args_rejects_unknown_flag() {
        assert!(Args::try_parse_from(["export_leads", "--format", "xlsx"]).is_err());
        assert!(Args::try_parse_from(["export_leads", "--columns"]).is_err());
    }
}
