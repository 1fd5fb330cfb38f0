use reqwest::Client;

use crate::config::AppConfig;
use crate::database::supabase::SupabaseStore;
use crate::errors::{AppError, Result};
use crate::session::SessionHolder;

pub fn build_http_client(config: &AppConfig) -> Result<Client> {
    Client::builder()
        .timeout(config.http_timeout)
        .build()
        .map_err(|e| AppError::configuration(format!("Failed to create HTTP client: {}", e)))
}

/// Build the store client and check that the table API answers.
/// An unreachable store is logged, not fatal: screens degrade on their own.
pub async fn get_store_client(config: &AppConfig, session: SessionHolder) -> Result<SupabaseStore> {
    let client = build_http_client(config)?;
    let store = SupabaseStore::new(config.clone(), client, session);

    match store.ping().await {
        Ok(()) => tracing::info!("✅ Connected to store at {}", config.supabase_url),
        Err(e) => tracing::warn!("⚠️ Store at {} may be unreachable: {}", config.supabase_url, e),
    }

    Ok(store)
}
