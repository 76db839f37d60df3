use chrono::FixedOffset;
use serde::Deserialize;
use std::collections::HashMap;

/// Which store backs leads and admin sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Hosted Supabase project (REST rows + password auth).
    Supabase,
    /// Direct Postgres connection with locally configured admin credentials.
    Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub backend: BackendKind,
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub database_url: Option<String>,
    pub admin_email: Option<String>,
    /// Hex SHA-256 of the admin password.
    pub admin_password_sha256: Option<String>,
    pub session_ttl_secs: u64,
    /// Offset used to render timestamps in exports (São Paulo is -3).
    pub display_utc_offset_hours: i32,
    /// Coupon code -> PIN lookup table.
    pub coupon_pins: HashMap<String, String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let backend = parse_backend(&std::env::var("LEAD_BACKEND").unwrap_or_else(|_| "supabase".to_string()))?;

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            backend,
            supabase_url: optional_var("SUPABASE_URL")
                .map(|url| validate_http_url("SUPABASE_URL", url))
                .transpose()?,
            supabase_anon_key: optional_var("SUPABASE_ANON_KEY"),
            database_url: optional_var("DATABASE_URL")
                .or_else(|| optional_var("DB_URL"))
                .map(|url| {
                    if !url.starts_with("postgresql://") && !url.starts_with("postgres://") {
                        anyhow::bail!("DATABASE_URL must start with postgresql:// or postgres://");
                    }
                    Ok(url)
                })
                .transpose()?,
            admin_email: optional_var("ADMIN_EMAIL").map(|e| e.to_lowercase()),
            admin_password_sha256: optional_var("ADMIN_PASSWORD_SHA256")
                .map(|hash| {
                    let hash = hash.to_lowercase();
                    if hash.len() != 64 || hex::decode(&hash).is_err() {
                        anyhow::bail!("ADMIN_PASSWORD_SHA256 must be a 64-character hex SHA-256 digest");
                    }
                    Ok(hash)
                })
                .transpose()?,
            session_ttl_secs: std::env::var("SESSION_TTL_SECS")
                .unwrap_or_else(|_| "28800".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("SESSION_TTL_SECS must be a positive number of seconds"))?,
            display_utc_offset_hours: std::env::var("DISPLAY_UTC_OFFSET_HOURS")
                .unwrap_or_else(|_| "-3".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("DISPLAY_UTC_OFFSET_HOURS must be an integer"))?,
            coupon_pins: parse_coupon_pins(&std::env::var("COUPON_PINS").unwrap_or_default())?,
        };

        config.validate()?;

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Lead backend: {:?}", config.backend);
        if let Some(ref url) = config.supabase_url {
            tracing::debug!("Supabase URL: {}", url);
        }
        if let Some(ref url) = config.database_url {
            tracing::debug!("Database URL: {}...", &url[..20.min(url.len())]);
        }
        tracing::debug!("Coupon PINs configured: {}", config.coupon_pins.len());
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }

    /// Checks that the selected backend has everything it needs.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.display_offset().is_none() {
            anyhow::bail!("DISPLAY_UTC_OFFSET_HOURS must be between -23 and 23");
        }
        if self.session_ttl_secs == 0 {
            anyhow::bail!("SESSION_TTL_SECS must be greater than zero");
        }

        match self.backend {
            BackendKind::Supabase => {
                if self.supabase_url.is_none() {
                    anyhow::bail!("SUPABASE_URL environment variable required for the supabase backend");
                }
                if self.supabase_anon_key.is_none() {
                    anyhow::bail!("SUPABASE_ANON_KEY environment variable required for the supabase backend");
                }
            }
            BackendKind::Postgres => {
                if self.database_url.is_none() {
                    anyhow::bail!("DATABASE_URL environment variable required for the postgres backend");
                }
                if self.admin_email.is_none() || self.admin_password_sha256.is_none() {
                    anyhow::bail!(
                        "ADMIN_EMAIL and ADMIN_PASSWORD_SHA256 are required for the postgres backend"
                    );
                }
            }
        }

        Ok(())
    }

    /// Offset used when rendering timestamps for people.
    pub fn display_offset(&self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.display_utc_offset_hours.checked_mul(3600)?)
    }

    /// PIN configured for a coupon code, if any.
    pub fn pin_for(&self, coupon_code: &str) -> Option<String> {
        self.coupon_pins.get(coupon_code).cloned()
    }
}

fn optional_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_backend(raw: &str) -> anyhow::Result<BackendKind> {
    match raw.trim().to_lowercase().as_str() {
        "supabase" => Ok(BackendKind::Supabase),
        "postgres" | "postgresql" => Ok(BackendKind::Postgres),
        other => anyhow::bail!("LEAD_BACKEND must be 'supabase' or 'postgres', got '{}'", other),
    }
}

fn validate_http_url(key: &str, raw: String) -> anyhow::Result<String> {
    let parsed = url::Url::parse(&raw).map_err(|e| anyhow::anyhow!("{} is not a valid URL: {}", key, e))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        anyhow::bail!("{} must start with http:// or https://", key);
    }
    Ok(raw.trim_end_matches('/').to_string())
}

/// Parses `CODE=PIN` pairs separated by commas, e.g. `12OFF=1234,30OFF=5678`.
pub fn parse_coupon_pins(raw: &str) -> anyhow::Result<HashMap<String, String>> {
    let mut pins = HashMap::new();
    for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let Some((code, pin)) = pair.split_once('=') else {
            anyhow::bail!("COUPON_PINS entry '{}' must look like CODE=PIN", pair);
        };
        let (code, pin) = (code.trim(), pin.trim());
        if code.is_empty() || pin.is_empty() {
            anyhow::bail!("COUPON_PINS entry '{}' has an empty code or PIN", pair);
        }
        pins.insert(code.to_string(), pin.to_string());
    }
    Ok(pins)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config(backend: BackendKind) -> Config {
        Config {
            port: 3000,
            backend,
            supabase_url: Some("https://project.supabase.co".to_string()),
            supabase_anon_key: Some("anon".to_string()),
            database_url: None,
            admin_email: None,
            admin_password_sha256: None,
            session_ttl_secs: 3600,
            display_utc_offset_hours: -3,
            coupon_pins: HashMap::new(),
        }
    }

    #[test]
    fn test_parse_coupon_pins() {
        let pins = parse_coupon_pins("12OFF=1234, 30OFF = 5678 ,").unwrap();
        assert_eq!(pins.get("12OFF").map(String::as_str), Some("1234"));
        assert_eq!(pins.get("30OFF").map(String::as_str), Some("5678"));
        assert!(parse_coupon_pins("").unwrap().is_empty());
        assert!(parse_coupon_pins("12OFF").is_err());
        assert!(parse_coupon_pins("=1234").is_err());
    }

    #[test]
    fn test_parse_backend() {
        assert_eq!(parse_backend("Supabase").unwrap(), BackendKind::Supabase);
        assert_eq!(parse_backend("postgresql").unwrap(), BackendKind::Postgres);
        assert!(parse_backend("mysql").is_err());
    }

    #[test]
    fn test_validate_http_url_trims_slash() {
        assert_eq!(
            validate_http_url("SUPABASE_URL", "https://x.supabase.co/".to_string()).unwrap(),
            "https://x.supabase.co"
        );
        assert!(validate_http_url("SUPABASE_URL", "ftp://x".to_string()).is_err());
        assert!(validate_http_url("SUPABASE_URL", "not a url".to_string()).is_err());
    }

    #[test]
    fn test_validate_requires_backend_settings() {
        assert!(base_config(BackendKind::Supabase).validate().is_ok());

        let mut pg = base_config(BackendKind::Postgres);
        assert!(pg.validate().is_err());
        pg.database_url = Some("postgres://localhost/leads".to_string());
        pg.admin_email = Some("admin@example.com".to_string());
        pg.admin_password_sha256 = Some("0".repeat(64));
        assert!(pg.validate().is_ok());
    }

    #[test]
    fn test_display_offset() {
        let config = base_config(BackendKind::Supabase);
        assert_eq!(config.display_offset().map(|o| o.local_minus_utc()), Some(-3 * 3600));

        let mut bad = base_config(BackendKind::Supabase);
        bad.display_utc_offset_hours = 30;
        assert!(bad.display_offset().is_none());
        assert!(bad.validate().is_err());
    }
}
