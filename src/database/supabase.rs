use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::AppConfig;
use crate::database::query::TableQuery;
use crate::database::store::{self, DataStore, TransactionQuery};
use crate::errors::{AppError, Result};
use crate::models::bank_account::{NewBankAccount, UserBankAccount};
use crate::models::cms::{CmsContent, DepositBank};
use crate::models::game::Game;
use crate::models::requests::{NewDepositRequest, NewWithdrawalRequest};
use crate::models::transaction::Transaction;
use crate::models::user::{ProfileUpdate, User};
use crate::models::vip::{UserVipStatus, VipLevel};
use crate::models::wallet::Wallet;
use crate::session::SessionHolder;

/// Error body returned by the table API.
#[derive(Debug, Deserialize)]
struct StoreErrorBody {
    message: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

/// [`DataStore`] backed by the hosted table, storage and auth HTTP APIs.
/// Requests carry the signed-in user's access token so row-level security
/// applies; without a session the anon key is used.
#[derive(Clone)]
pub struct SupabaseStore {
    config: AppConfig,
    client: Client,
    session: SessionHolder,
}

impl SupabaseStore {
    pub fn new(config: AppConfig, client: Client, session: SessionHolder) -> Self {
        SupabaseStore {
            config,
            client,
            session,
        }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self
            .session
            .access_token()
            .unwrap_or_else(|| self.config.supabase_anon_key.clone());
        request
            .header("apikey", &self.config.supabase_anon_key)
            .bearer_auth(bearer)
    }

    async fn fetch<T: DeserializeOwned>(&self, table: &str, query: &TableQuery) -> Result<Vec<T>> {
        let request = self
            .client
            .get(self.config.rest_url(table))
            .query(query.params());
        let response = check(table, self.authorized(request).send().await?).await?;
        Ok(response.json::<Vec<T>>().await?)
    }

    async fn fetch_one<T: DeserializeOwned>(&self, table: &str, query: TableQuery) -> Result<Option<T>> {
        let rows: Vec<T> = self.fetch(table, &query.limit(1)).await?;
        Ok(rows.into_iter().next())
    }

    async fn insert<B: Serialize + ?Sized>(&self, table: &str, body: &B) -> Result<()> {
        let request = self
            .client
            .post(self.config.rest_url(table))
            .header("Prefer", "return=minimal")
            .json(body);
        check(table, self.authorized(request).send().await?).await?;
        info!("Inserted row into {}", table);
        Ok(())
    }

    async fn insert_returning<B, T>(&self, table: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .client
            .post(self.config.rest_url(table))
            .header("Prefer", "return=representation")
            .json(body);
        let response = check(table, self.authorized(request).send().await?).await?;
        let rows: Vec<T> = response.json().await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| AppError::remote(200, format!("insert into {} returned no row", table)))
    }

    async fn update<B: Serialize + ?Sized>(&self, table: &str, query: &TableQuery, body: &B) -> Result<()> {
        let request = self
            .client
            .patch(self.config.rest_url(table))
            .query(query.params())
            .header("Prefer", "return=minimal")
            .json(body);
        check(table, self.authorized(request).send().await?).await?;
        Ok(())
    }

    /// Cheap read used at start-up to confirm the store is reachable.
    pub async fn ping(&self) -> Result<()> {
        let _: Vec<serde_json::Value> = self
            .fetch(store::VIP_LEVELS, &TableQuery::new().select("level_id").limit(1))
            .await?;
        Ok(())
    }
}

async fn check(table: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let raw = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<StoreErrorBody>(&raw) {
        Ok(body) => {
            error!(
                "❌ {} request failed ({}): {} code={:?} hint={:?}",
                table, status, body.message, body.code, body.hint
            );
            body.message
        }
        Err(_) => {
            error!("❌ {} request failed ({}): {}", table, status, raw);
            raw
        }
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AppError::PermissionDenied(message)),
        _ => Err(AppError::remote(status.as_u16(), message)),
    }
}

#[async_trait]
impl DataStore for SupabaseStore {
    async fn find_user_by_auth_id(&self, auth_id: &str) -> Result<Option<User>> {
        self.fetch_one(store::USERS, TableQuery::new().eq("supabase_auth_id", auth_id))
            .await
    }

    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> Result<()> {
        self.update(store::USERS, &TableQuery::new().eq("user_id", user_id), update)
            .await
    }

    async fn find_wallet(&self, user_id: &str) -> Result<Option<Wallet>> {
        self.fetch_one(store::USER_WALLET, TableQuery::new().eq("user_id", user_id))
            .await
    }

    async fn list_transactions(&self, query: &TransactionQuery) -> Result<Vec<Transaction>> {
        self.fetch(store::TRANSACTIONS, &query.to_table_query()).await
    }

    async fn find_vip_status(&self, user_id: &str) -> Result<Option<UserVipStatus>> {
        self.fetch_one(store::USER_VIP_STATUS, TableQuery::new().eq("user_id", user_id))
            .await
    }

    async fn insert_vip_status(&self, status: &UserVipStatus) -> Result<()> {
        self.insert(store::USER_VIP_STATUS, status).await
    }

    async fn list_vip_levels(&self) -> Result<Vec<VipLevel>> {
        self.fetch(store::VIP_LEVELS, &TableQuery::new().order("level_id", true))
            .await
    }

    async fn insert_deposit_request(&self, request: &NewDepositRequest) -> Result<()> {
        self.insert(store::DEPOSIT_REQUESTS, request).await
    }

    async fn insert_withdrawal_request(&self, request: &NewWithdrawalRequest) -> Result<()> {
        self.insert(store::WITHDRAWAL_REQUESTS, request).await
    }

    async fn list_bank_accounts(&self, user_id: &str) -> Result<Vec<UserBankAccount>> {
        self.fetch(
            store::USER_BANK_ACCOUNTS,
            &TableQuery::new().eq("user_id", user_id).order("id", true),
        )
        .await
    }

    async fn insert_bank_account(&self, account: &NewBankAccount) -> Result<UserBankAccount> {
        self.insert_returning(store::USER_BANK_ACCOUNTS, account).await
    }

    async fn find_deposit_bank(&self, id: i64) -> Result<Option<DepositBank>> {
        self.fetch_one(store::DEPOSIT_BANK, TableQuery::new().eq("id", id))
            .await
    }

    async fn list_active_games(&self) -> Result<Vec<Game>> {
        self.fetch(
            store::GAME_CATALOG,
            &TableQuery::new().eq("is_active", true).order("game_id", true),
        )
        .await
    }

    async fn list_active_content(&self) -> Result<Vec<CmsContent>> {
        self.fetch(
            store::CMS_CONTENT,
            &TableQuery::new().eq("is_active", true).order("sort_order", true),
        )
        .await
    }

    async fn find_active_content(&self, key: &str) -> Result<Option<CmsContent>> {
        self.fetch_one(
            store::CMS_CONTENT,
            TableQuery::new().eq("content_key", key).eq("is_active", true),
        )
        .await
    }

    async fn upload_object(&self, path: &str, content_type: &str, body: Bytes) -> Result<String> {
        let request = self
            .client
            .post(self.config.storage_upload_url(path))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(body);
        check("storage", self.authorized(request).send().await?).await?;

        let url = self.config.storage_public_url(path);
        info!("✅ Uploaded {} ({})", path, content_type);
        Ok(url)
    }
}
