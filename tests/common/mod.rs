#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{TimeZone, Utc};

use casino_lobby::config::AppConfig;
use casino_lobby::database::{DataStore, TransactionQuery};
use casino_lobby::errors::{AppError, Result};
use casino_lobby::models::bank_account::{NewBankAccount, UserBankAccount};
use casino_lobby::models::cms::{CmsContent, DepositBank};
use casino_lobby::models::game::Game;
use casino_lobby::models::requests::{NewDepositRequest, NewWithdrawalRequest};
use casino_lobby::models::transaction::{Transaction, TransactionStatus, TransactionType};
use casino_lobby::models::user::{ProfileUpdate, User};
use casino_lobby::models::vip::{UserVipStatus, VipLevel};
use casino_lobby::models::wallet::Wallet;
use casino_lobby::services::auth_service::{AuthProvider, SignUpMetadata};
use casino_lobby::session::{AuthEvent, AuthUser, Session, SessionHolder};
use casino_lobby::AppState;

pub const AUTH_ID: &str = "auth-jane";
pub const USER_ID: &str = "4f1c2a9e-0b7d-4a52-9c11-3f7e2d1a0b6c";

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap()
}

/// In-memory store that records every write and can be told to fail.
#[derive(Default)]
pub struct MockStore {
    pub users: Mutex<Vec<User>>,
    pub wallets: Mutex<HashMap<String, Wallet>>,
    pub transactions: Mutex<Vec<Transaction>>,
    pub vip_statuses: Mutex<HashMap<String, UserVipStatus>>,
    pub vip_levels: Mutex<Vec<VipLevel>>,
    pub bank_accounts: Mutex<Vec<UserBankAccount>>,
    pub deposit_bank: Mutex<Option<DepositBank>>,
    pub games: Mutex<Vec<Game>>,
    pub content: Mutex<Vec<CmsContent>>,

    pub withdrawal_inserts: Mutex<Vec<NewWithdrawalRequest>>,
    pub deposit_inserts: Mutex<Vec<NewDepositRequest>>,
    pub vip_inserts: Mutex<Vec<UserVipStatus>>,
    pub profile_updates: Mutex<Vec<(String, ProfileUpdate)>>,
    pub uploads: Mutex<Vec<(String, String, usize)>>,
    pub transaction_queries: Mutex<Vec<TransactionQuery>>,

    pub fail_vip_insert: AtomicBool,
    pub fail_inserts: AtomicBool,
}

impl MockStore {
    pub fn with_user() -> Self {
        let store = MockStore::default();
        lock(&store.users).push(user());
        store
    }

    pub fn set_wallet(&self, balance: f64, bonus: f64) {
        lock(&self.wallets).insert(
            USER_ID.to_string(),
            Wallet {
                user_id: USER_ID.to_string(),
                balance,
                bonus_balance: bonus,
                currency_code: "AUD".to_string(),
            },
        );
    }

    pub fn insert_count(&self) -> usize {
        lock(&self.withdrawal_inserts).len() + lock(&self.deposit_inserts).len()
    }

    fn write_guard(&self) -> Result<()> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(AppError::remote(500, "insert failed"));
        }
        Ok(())
    }
}

#[async_trait]
impl DataStore for MockStore {
    async fn find_user_by_auth_id(&self, auth_id: &str) -> Result<Option<User>> {
        Ok(lock(&self.users)
            .iter()
            .find(|u| u.supabase_auth_id.as_deref() == Some(auth_id))
            .cloned())
    }

    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> Result<()> {
        self.write_guard()?;
        lock(&self.profile_updates).push((user_id.to_string(), update.clone()));
        Ok(())
    }

    async fn find_wallet(&self, user_id: &str) -> Result<Option<Wallet>> {
        Ok(lock(&self.wallets).get(user_id).cloned())
    }

    async fn list_transactions(&self, query: &TransactionQuery) -> Result<Vec<Transaction>> {
        lock(&self.transaction_queries).push(query.clone());
        let mut rows: Vec<Transaction> = lock(&self.transactions)
            .iter()
            .filter(|t| query.matches(t))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(n) = query.limit {
            rows.truncate(n);
        }
        Ok(rows)
    }

    async fn find_vip_status(&self, user_id: &str) -> Result<Option<UserVipStatus>> {
        Ok(lock(&self.vip_statuses).get(user_id).cloned())
    }

    async fn insert_vip_status(&self, status: &UserVipStatus) -> Result<()> {
        if self.fail_vip_insert.load(Ordering::SeqCst) {
            return Err(AppError::PermissionDenied("new row violates row-level security policy".into()));
        }
        lock(&self.vip_inserts).push(status.clone());
        lock(&self.vip_statuses).insert(status.user_id.clone(), status.clone());
        Ok(())
    }

    async fn list_vip_levels(&self) -> Result<Vec<VipLevel>> {
        Ok(lock(&self.vip_levels).clone())
    }

    async fn insert_deposit_request(&self, request: &NewDepositRequest) -> Result<()> {
        self.write_guard()?;
        lock(&self.deposit_inserts).push(request.clone());
        Ok(())
    }

    async fn insert_withdrawal_request(&self, request: &NewWithdrawalRequest) -> Result<()> {
        self.write_guard()?;
        lock(&self.withdrawal_inserts).push(request.clone());
        Ok(())
    }

    async fn list_bank_accounts(&self, user_id: &str) -> Result<Vec<UserBankAccount>> {
        Ok(lock(&self.bank_accounts)
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert_bank_account(&self, account: &NewBankAccount) -> Result<UserBankAccount> {
        self.write_guard()?;
        let mut accounts = lock(&self.bank_accounts);
        let saved = UserBankAccount {
            id: Some(accounts.len() as i64 + 1),
            user_id: account.user_id.clone(),
            bank_name: account.bank_name.clone(),
            account_name: account.account_name.clone(),
            account_number: account.account_number.clone(),
            bsb: account.bsb.clone(),
            is_verified: false,
        };
        accounts.push(saved.clone());
        Ok(saved)
    }

    async fn find_deposit_bank(&self, id: i64) -> Result<Option<DepositBank>> {
        Ok(lock(&self.deposit_bank).clone().filter(|b| b.id == id))
    }

    async fn list_active_games(&self) -> Result<Vec<Game>> {
        Ok(lock(&self.games).iter().filter(|g| g.is_active).cloned().collect())
    }

    async fn list_active_content(&self) -> Result<Vec<CmsContent>> {
        Ok(lock(&self.content).iter().filter(|c| c.is_active).cloned().collect())
    }

    async fn find_active_content(&self, key: &str) -> Result<Option<CmsContent>> {
        Ok(lock(&self.content)
            .iter()
            .find(|c| c.is_active && c.content_key == key)
            .cloned())
    }

    async fn upload_object(&self, path: &str, content_type: &str, body: Bytes) -> Result<String> {
        self.write_guard()?;
        lock(&self.uploads).push((path.to_string(), content_type.to_string(), body.len()));
        Ok(format!("https://demo.supabase.co/storage/v1/object/public/receipts/{}", path))
    }
}

/// Auth double: accepts one email/password pair.
#[derive(Default)]
pub struct MockAuth {
    pub password: Mutex<String>,
    pub sign_ups: Mutex<Vec<(String, SignUpMetadata)>>,
    pub sign_outs: Mutex<usize>,
    pub require_confirmation: AtomicBool,
    pub fail_sign_out: AtomicBool,
}

impl MockAuth {
    pub fn with_password(password: &str) -> Self {
        let auth = MockAuth::default();
        *lock(&auth.password) = password.to_string();
        auth
    }
}

#[async_trait]
impl AuthProvider for MockAuth {
    async fn sign_up(&self, email: &str, _password: &str, metadata: &SignUpMetadata) -> Result<Option<Session>> {
        lock(&self.sign_ups).push((email.to_string(), metadata.clone()));
        if self.require_confirmation.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(Some(session_for(email)))
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        if *lock(&self.password) != password {
            return Err(AppError::invalid_data("Invalid login credentials"));
        }
        Ok(session_for(email))
    }

    async fn refresh(&self, _refresh_token: &str) -> Result<Session> {
        let mut session = session_for("jane@example.com");
        session.access_token = "refreshed-access".to_string();
        Ok(session)
    }

    async fn sign_out(&self, _access_token: &str) -> Result<()> {
        *lock(&self.sign_outs) += 1;
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(AppError::remote(503, "unavailable"));
        }
        Ok(())
    }

    async fn update_password(&self, _access_token: &str, password: &str) -> Result<AuthUser> {
        *lock(&self.password) = password.to_string();
        Ok(session_for("jane@example.com").user)
    }
}

pub fn config() -> AppConfig {
    AppConfig {
        supabase_url: "https://demo.supabase.co".to_string(),
        supabase_anon_key: "anon".to_string(),
        receipt_bucket: "receipts".to_string(),
        deposit_bank_id: 2,
        phone_login_domain: "bet9u.local".to_string(),
        http_timeout: Duration::from_secs(5),
    }
}

pub fn user() -> User {
    User {
        user_id: USER_ID.to_string(),
        supabase_auth_id: Some(AUTH_ID.to_string()),
        email: "jane@example.com".to_string(),
        mobile_num: None,
        username: "User_jane".to_string(),
        real_name: None,
        gender: None,
        dob: None,
        created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
    }
}

pub fn session_for(email: &str) -> Session {
    Session {
        access_token: "access".to_string(),
        refresh_token: "refresh".to_string(),
        expires_at: None,
        user: AuthUser {
            id: AUTH_ID.to_string(),
            email: Some(email.to_string()),
            phone: None,
        },
    }
}

pub fn tx(id: i64, kind: TransactionType, status: TransactionStatus, day: u32, hour: u32, amount: f64) -> Transaction {
    Transaction {
        transaction_id: id,
        user_id: USER_ID.to_string(),
        transaction_type: kind,
        amount,
        external_ref_id: None,
        status,
        payment_method: "PayID".to_string(),
        created_at: Utc.with_ymd_and_hms(2025, 12, day, hour, 0, 0).unwrap(),
    }
}

pub fn vip_level(id: i32, deposit: f64, turnover: f64) -> VipLevel {
    VipLevel {
        level_id: id,
        level_name: format!("VIP {}", id),
        min_cumulative_deposit: deposit,
        min_cumulative_turnover: turnover,
        daily_rebate_rate: 0.1 * id as f64,
        withdrawal_limit_multiplier: 1.0,
    }
}

pub struct Harness {
    pub state: AppState,
    pub store: Arc<MockStore>,
    pub auth: Arc<MockAuth>,
}

/// State wired to the doubles, with nobody signed in.
pub fn guest(store: MockStore) -> Harness {
    let store = Arc::new(store);
    let auth = Arc::new(MockAuth::with_password("secret"));
    let state = AppState::new(config(), store.clone(), auth.clone(), SessionHolder::new());
    Harness { state, store, auth }
}

/// Same as [`guest`] with Jane already signed in.
pub fn signed_in(store: MockStore) -> Harness {
    let harness = guest(store);
    harness
        .state
        .session
        .set(AuthEvent::SignedIn, Some(session_for("jane@example.com")));
    harness
}
