// config.rs
use std::env;
use std::time::Duration;

use crate::errors::{AppError, Result};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub receipt_bucket: String,
    pub deposit_bank_id: i64,
    pub phone_login_domain: String,
    pub http_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let supabase_url = env::var("SUPABASE_URL")
            .map_err(|_| AppError::configuration("SUPABASE_URL must be set"))?;
        let supabase_anon_key = env::var("SUPABASE_ANON_KEY")
            .map_err(|_| AppError::configuration("SUPABASE_ANON_KEY must be set"))?;

        let deposit_bank_id = env::var("DEPOSIT_BANK_ID")
            .unwrap_or_else(|_| "2".to_string())
            .parse()
            .map_err(|_| AppError::configuration("DEPOSIT_BANK_ID must be a number"))?;

        let timeout_secs: u64 = env::var("HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| AppError::configuration("HTTP_TIMEOUT_SECS must be a number"))?;

        let config = AppConfig {
            supabase_url: supabase_url.trim_end_matches('/').to_string(),
            supabase_anon_key,
            receipt_bucket: env::var("RECEIPT_BUCKET").unwrap_or_else(|_| "receipts".to_string()),
            deposit_bank_id,
            phone_login_domain: env::var("PHONE_LOGIN_DOMAIN")
                .unwrap_or_else(|_| "bet9u.local".to_string()),
            http_timeout: Duration::from_secs(timeout_secs),
        };

        tracing::debug!("Loaded config for {}", config.supabase_url);
        Ok(config)
    }

    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.supabase_url, table)
    }

    pub fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.supabase_url, path.trim_start_matches('/'))
    }

    pub fn storage_upload_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.supabase_url, self.receipt_bucket, path
        )
    }

    pub fn storage_public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.supabase_url, self.receipt_bucket, path
        )
    }

    pub fn config_info(&self) -> serde_json::Value {
        serde_json::json!({
            "supabase_url": self.supabase_url,
            "anon_key_set": !self.supabase_anon_key.is_empty(),
            "receipt_bucket": self.receipt_bucket,
            "deposit_bank_id": self.deposit_bank_id,
            "phone_login_domain": self.phone_login_domain,
            "http_timeout_secs": self.http_timeout.as_secs(),
        })
    }
}
