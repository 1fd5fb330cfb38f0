use async_trait::async_trait;
use bytes::Bytes;
use chrono::NaiveDateTime;

use crate::database::query::TableQuery;
use crate::errors::Result;
use crate::models::bank_account::{NewBankAccount, UserBankAccount};
use crate::models::cms::{CmsContent, DepositBank};
use crate::models::game::Game;
use crate::models::requests::{NewDepositRequest, NewWithdrawalRequest};
use crate::models::transaction::{Transaction, TransactionStatus, TransactionType};
use crate::models::user::{ProfileUpdate, User};
use crate::models::vip::{UserVipStatus, VipLevel};
use crate::models::wallet::Wallet;

pub const USERS: &str = "users";
pub const USER_WALLET: &str = "user_wallet";
pub const TRANSACTIONS: &str = "transactions";
pub const USER_VIP_STATUS: &str = "user_vip_status";
pub const VIP_LEVELS: &str = "vip_levels";
pub const DEPOSIT_REQUESTS: &str = "deposit_requests";
pub const WITHDRAWAL_REQUESTS: &str = "withdrawal_requests";
pub const USER_BANK_ACCOUNTS: &str = "user_bank_accounts";
pub const DEPOSIT_BANK: &str = "depositBank";
pub const GAME_CATALOG: &str = "game_catalog";
pub const CMS_CONTENT: &str = "cms_content";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Ledger query for one user. Bounds are UTC wall-clock times; the upper
/// bound is exclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionQuery {
    pub user_id: String,
    pub transaction_type: Option<TransactionType>,
    pub status: Option<TransactionStatus>,
    pub created_from: Option<NaiveDateTime>,
    pub created_before: Option<NaiveDateTime>,
    pub limit: Option<usize>,
}

impl TransactionQuery {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        TransactionQuery {
            user_id: user_id.into(),
            transaction_type: None,
            status: None,
            created_from: None,
            created_before: None,
            limit: None,
        }
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Same predicate the store applies, for callers holding rows in memory.
    pub fn matches(&self, tx: &Transaction) -> bool {
        let at = tx.created_at.naive_utc();
        tx.user_id == self.user_id
            && self
                .transaction_type
                .as_ref()
                .map_or(true, |t| &tx.transaction_type == t)
            && self.status.map_or(true, |s| tx.status == s)
            && self.created_from.map_or(true, |from| at >= from)
            && self.created_before.map_or(true, |before| at < before)
    }

    /// Newest first.
    pub fn to_table_query(&self) -> TableQuery {
        let mut q = TableQuery::new().eq("user_id", &self.user_id);
        if let Some(from) = self.created_from {
            q = q.gte("created_at", from.format(TIMESTAMP_FORMAT));
        }
        if let Some(before) = self.created_before {
            q = q.lt("created_at", before.format(TIMESTAMP_FORMAT));
        }
        if let Some(t) = &self.transaction_type {
            q = q.eq("transaction_type", t.as_str());
        }
        if let Some(s) = self.status {
            q = q.eq("status", s.as_str());
        }
        q = q.order("created_at", false);
        if let Some(n) = self.limit {
            q = q.limit(n);
        }
        q
    }
}

/// Everything the client reads from or writes to the hosted store.
/// Single-row lookups return `Ok(None)` when no row is visible.
#[async_trait]
pub trait DataStore: Send + Sync {
    async fn find_user_by_auth_id(&self, auth_id: &str) -> Result<Option<User>>;
    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> Result<()>;

    async fn find_wallet(&self, user_id: &str) -> Result<Option<Wallet>>;
    async fn list_transactions(&self, query: &TransactionQuery) -> Result<Vec<Transaction>>;

    async fn find_vip_status(&self, user_id: &str) -> Result<Option<UserVipStatus>>;
    async fn insert_vip_status(&self, status: &UserVipStatus) -> Result<()>;
    /// Ordered ascending by `level_id`.
    async fn list_vip_levels(&self) -> Result<Vec<VipLevel>>;

    async fn insert_deposit_request(&self, request: &NewDepositRequest) -> Result<()>;
    async fn insert_withdrawal_request(&self, request: &NewWithdrawalRequest) -> Result<()>;

    async fn list_bank_accounts(&self, user_id: &str) -> Result<Vec<UserBankAccount>>;
    async fn insert_bank_account(&self, account: &NewBankAccount) -> Result<UserBankAccount>;
    async fn find_deposit_bank(&self, id: i64) -> Result<Option<DepositBank>>;

    /// Active games ordered by `game_id`.
    async fn list_active_games(&self) -> Result<Vec<Game>>;
    /// Active content ordered by `sort_order`.
    async fn list_active_content(&self) -> Result<Vec<CmsContent>>;
    async fn find_active_content(&self, key: &str) -> Result<Option<CmsContent>>;

    /// Store an object and return its public URL.
    async fn upload_object(&self, path: &str, content_type: &str, body: Bytes) -> Result<String>;
}
