use tracing::info;
use validator::Validate;

use crate::errors::{AppError, Result};
use crate::models::bank_account::{NewBankAccount, UserBankAccount};
use crate::models::user::{ProfileUpdate, User};
use crate::state::AppState;

pub const MAX_BANK_ACCOUNTS: usize = 3;

/// The `users` row behind the signed-in auth identity.
pub async fn current_user(state: &AppState) -> Result<User> {
    let subject = state.session.subject().ok_or(AppError::NotSignedIn)?;
    state
        .store
        .find_user_by_auth_id(&subject)
        .await?
        .ok_or(AppError::ProfileNotFound)
}

pub async fn update_profile(state: &AppState, update: &ProfileUpdate) -> Result<()> {
    if update.is_empty() {
        return Err(AppError::invalid_data("Nothing to update"));
    }
    update.validate()?;
    let user = current_user(state).await?;
    state.store.update_profile(&user.user_id, update).await?;
    info!("✅ Profile updated for {}", user.display_id());
    Ok(())
}

pub async fn list_bank_accounts(state: &AppState) -> Result<Vec<UserBankAccount>> {
    let user = current_user(state).await?;
    state.store.list_bank_accounts(&user.user_id).await
}

pub async fn add_bank_account(state: &AppState, form: NewBankAccount) -> Result<UserBankAccount> {
    form.validate()?;
    let user = current_user(state).await?;

    let existing = state.store.list_bank_accounts(&user.user_id).await?;
    if existing.len() >= MAX_BANK_ACCOUNTS {
        return Err(AppError::invalid_data("Maximum 3 bank accounts allowed."));
    }

    let account = NewBankAccount {
        user_id: user.user_id,
        ..form
    };
    let saved = state.store.insert_bank_account(&account).await?;
    info!("✅ Bank account added: {}", saved.masked_label());
    Ok(saved)
}
