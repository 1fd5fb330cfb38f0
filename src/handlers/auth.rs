use chrono::Utc;
use tracing::{info, warn};

use crate::errors::{AppError, Result};
use crate::services::auth_service::{session_from_tokens, Credentials};
use crate::session::{AuthEvent, Session};
use crate::state::AppState;

#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub credentials: Credentials,
    pub agreed_to_terms: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegisterOutcome {
    SignedIn(Session),
    /// The account exists but has to be confirmed before signing in.
    ConfirmationRequired,
}

pub async fn register(state: &AppState, registration: &Registration) -> Result<RegisterOutcome> {
    let credentials = &registration.credentials;
    let email = credentials.login_email(&state.config.phone_login_domain)?;
    let password = credentials.require_password()?;

    if !registration.agreed_to_terms {
        return Err(AppError::invalid_data("You must agree to the Terms & Conditions"));
    }

    let metadata = credentials.sign_up_metadata();
    match state.auth.sign_up(&email, password, &metadata).await? {
        Some(session) => {
            state.session.set(AuthEvent::SignedIn, Some(session.clone()));
            Ok(RegisterOutcome::SignedIn(session))
        }
        None => Ok(RegisterOutcome::ConfirmationRequired),
    }
}

pub async fn sign_in(state: &AppState, credentials: &Credentials) -> Result<Session> {
    let email = credentials.login_email(&state.config.phone_login_domain)?;
    let password = credentials.require_password()?;

    let session = state.auth.sign_in_with_password(&email, password).await?;
    state.session.set(AuthEvent::SignedIn, Some(session.clone()));
    Ok(session)
}

/// Local sign-out always happens, even if the server call fails.
pub async fn sign_out(state: &AppState) -> Result<()> {
    if let Some(token) = state.session.access_token() {
        if let Err(e) = state.auth.sign_out(&token).await {
            warn!("Server sign-out failed, clearing local session anyway: {}", e);
        }
    }
    state.session.set(AuthEvent::SignedOut, None);
    info!("Signed out");
    Ok(())
}

/// Pick up a session persisted outside the process, refreshing it when the
/// access token has already expired.
pub async fn restore_session(state: &AppState, access_token: &str, refresh_token: &str) -> Result<Session> {
    let session = session_from_tokens(access_token, refresh_token)?;
    if !session.is_expired(Utc::now()) {
        state.session.restore(Some(session.clone()));
        return Ok(session);
    }

    let refreshed = state.auth.refresh(refresh_token).await?;
    state.session.set(AuthEvent::TokenRefreshed, Some(refreshed.clone()));
    Ok(refreshed)
}

pub async fn change_password(state: &AppState, new_password: &str) -> Result<()> {
    let session = state.session.current().ok_or(AppError::NotSignedIn)?;
    if new_password.is_empty() {
        return Err(AppError::invalid_data("Password is required"));
    }

    let user = state.auth.update_password(&session.access_token, new_password).await?;
    state
        .session
        .set(AuthEvent::UserUpdated, Some(Session { user, ..session }));
    info!("✅ Password updated");
    Ok(())
}
