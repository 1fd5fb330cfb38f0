// services/auth_service.rs
use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::session::{AuthUser, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginMethod {
    Phone,
    #[default]
    Email,
}

/// What the sign-in / register form collects.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub method: LoginMethod,
    pub email: String,
    pub phone: String,
    pub password: String,
}

impl Credentials {
    /// Identifier the auth service knows the account by. Phone accounts log
    /// in with a synthetic address built from the digits of the number.
    pub fn login_email(&self, phone_domain: &str) -> Result<String> {
        match self.method {
            LoginMethod::Phone => {
                let digits: String = self.phone.chars().filter(|c| c.is_ascii_digit()).collect();
                if digits.is_empty() {
                    return Err(AppError::invalid_data("Phone number is required"));
                }
                Ok(format!("{}@{}", digits, phone_domain))
            }
            LoginMethod::Email => {
                let email = self.email.trim();
                if email.is_empty() {
                    return Err(AppError::invalid_data("Email is required"));
                }
                Ok(email.to_string())
            }
        }
    }

    pub fn require_password(&self) -> Result<&str> {
        if self.password.is_empty() {
            return Err(AppError::invalid_data("Password is required"));
        }
        Ok(&self.password)
    }

    /// Metadata copied into the `users` row by the sign-up trigger.
    pub fn sign_up_metadata(&self) -> SignUpMetadata {
        let username = match self.method {
            LoginMethod::Phone => {
                let chars: Vec<char> = self.phone.chars().collect();
                let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
                format!("User_{}", tail)
            }
            LoginMethod::Email => {
                let local = self.email.trim().split('@').next().unwrap_or_default();
                format!("User_{}", local)
            }
        };

        SignUpMetadata {
            mobile_num: match self.method {
                LoginMethod::Phone => Some(self.phone.clone()),
                LoginMethod::Email => None,
            },
            username,
            login_method: self.method,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignUpMetadata {
    #[serde(rename = "mobileNum")]
    pub mobile_num: Option<String>,
    pub username: String,
    pub login_method: LoginMethod,
}

/// Claims read from the access token. The signature is not checked here;
/// the store verifies every request it receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

pub fn decode_claims(access_token: &str) -> Result<AccessClaims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();

    let data = decode::<AccessClaims>(access_token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(data.claims)
}

/// Rebuild a session from tokens kept outside the process.
pub fn session_from_tokens(access_token: &str, refresh_token: &str) -> Result<Session> {
    let claims = decode_claims(access_token)?;
    Ok(Session {
        access_token: access_token.to_string(),
        refresh_token: refresh_token.to_string(),
        expires_at: claims.exp.and_then(|exp| DateTime::from_timestamp(exp, 0)),
        user: AuthUser {
            id: claims.sub,
            email: claims.email,
            phone: claims.phone,
        },
    })
}

/// Identity collaborator: sign-up, sign-in and account changes.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Returns `None` when the account still has to be confirmed.
    async fn sign_up(&self, email: &str, password: &str, metadata: &SignUpMetadata) -> Result<Option<Session>>;
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session>;
    async fn refresh(&self, refresh_token: &str) -> Result<Session>;
    async fn sign_out(&self, access_token: &str) -> Result<()>;
    async fn update_password(&self, access_token: &str, password: &str) -> Result<AuthUser>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: AuthUser,
}

impl TokenResponse {
    fn into_session(self, now: DateTime<Utc>) -> Session {
        let expires_at = self
            .expires_at
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .or_else(|| self.expires_in.map(|secs| now + Duration::seconds(secs)));
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}

/// Auth errors come in a few shapes depending on the endpoint.
#[derive(Debug, Default, Deserialize)]
struct AuthErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl AuthErrorBody {
    fn text(self) -> Option<String> {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
    }
}

#[derive(Clone)]
pub struct GoTrueClient {
    config: AppConfig,
    client: Client,
}

impl GoTrueClient {
    pub fn new(config: AppConfig, client: Client) -> Self {
        GoTrueClient { config, client }
    }

    async fn check(&self, action: &str, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let raw = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<AuthErrorBody>(&raw)
            .ok()
            .and_then(AuthErrorBody::text)
            .unwrap_or(raw);
        error!("Auth {} failed ({}): {}", action, status, message);

        // Bad credentials and weak passwords are the user's to fix.
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Err(AppError::Validation(message)),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AppError::PermissionDenied(message)),
            _ => Err(AppError::remote(status.as_u16(), message)),
        }
    }

    async fn token(&self, grant_type: &str, body: serde_json::Value) -> Result<Session> {
        let response = self
            .client
            .post(self.config.auth_url(&format!("token?grant_type={}", grant_type)))
            .header("apikey", &self.config.supabase_anon_key)
            .json(&body)
            .send()
            .await?;
        let response = self.check(grant_type, response).await?;
        let token: TokenResponse = response.json().await?;
        Ok(token.into_session(Utc::now()))
    }
}

#[async_trait]
impl AuthProvider for GoTrueClient {
    async fn sign_up(&self, email: &str, password: &str, metadata: &SignUpMetadata) -> Result<Option<Session>> {
        let response = self
            .client
            .post(self.config.auth_url("signup"))
            .header("apikey", &self.config.supabase_anon_key)
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "data": metadata,
            }))
            .send()
            .await?;
        let response = self.check("signup", response).await?;

        let body: serde_json::Value = response.json().await?;
        if body.get("access_token").is_some() {
            let token: TokenResponse = serde_json::from_value(body)?;
            info!("✅ Registered and signed in {}", email);
            Ok(Some(token.into_session(Utc::now())))
        } else {
            info!("Registered {}, awaiting confirmation", email);
            Ok(None)
        }
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        let session = self
            .token("password", serde_json::json!({ "email": email, "password": password }))
            .await?;
        info!("✅ Signed in {}", email);
        Ok(session)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session> {
        self.token("refresh_token", serde_json::json!({ "refresh_token": refresh_token }))
            .await
    }

    async fn sign_out(&self, access_token: &str) -> Result<()> {
        let response = self
            .client
            .post(self.config.auth_url("logout"))
            .header("apikey", &self.config.supabase_anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;
        self.check("logout", response).await?;
        Ok(())
    }

    async fn update_password(&self, access_token: &str, password: &str) -> Result<AuthUser> {
        let response = self
            .client
            .put(self.config.auth_url("user"))
            .header("apikey", &self.config.supabase_anon_key)
            .bearer_auth(access_token)
            .json(&serde_json::json!({ "password": password }))
            .send()
            .await?;
        let response = self.check("update_user", response).await?;
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn phone(p: &str) -> Credentials {
        Credentials {
            method: LoginMethod::Phone,
            phone: p.into(),
            password: "secret".into(),
            ..Default::default()
        }
    }

    #[test]
    fn phone_logins_use_synthetic_email() {
        let c = phone("0412 345-678");
        assert_eq!(c.login_email("bet9u.local").unwrap(), "0412345678@bet9u.local");

        let err = phone("").login_email("bet9u.local").unwrap_err();
        assert_eq!(err.user_message(), "Phone number is required");
    }

    #[test]
    fn email_and_password_required() {
        let c = Credentials::default();
        assert_eq!(c.login_email("x").unwrap_err().user_message(), "Email is required");
        assert_eq!(c.require_password().unwrap_err().user_message(), "Password is required");
    }

    #[test]
    fn default_usernames() {
        let meta = phone("0412345678").sign_up_metadata();
        assert_eq!(meta.username, "User_5678");
        assert_eq!(meta.mobile_num.as_deref(), Some("0412345678"));

        let email = Credentials {
            email: "jane.doe@example.com".into(),
            ..Default::default()
        };
        let meta = email.sign_up_metadata();
        assert_eq!(meta.username, "User_jane.doe");
        assert_eq!(meta.mobile_num, None);
        assert_eq!(
            serde_json::to_value(&meta).unwrap()["login_method"],
            serde_json::json!("email")
        );
    }

    #[test]
    fn reads_claims_without_the_signing_key() {
        let claims = AccessClaims {
            sub: "auth-123".into(),
            exp: Some(1_900_000_000),
            email: Some("jane@example.com".into()),
            phone: None,
            role: Some("authenticated".into()),
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"server-only")).unwrap();

        let decoded = decode_claims(&token).unwrap();
        assert_eq!(decoded, claims);

        let session = session_from_tokens(&token, "r1").unwrap();
        assert_eq!(session.user.id, "auth-123");
        assert_eq!(session.expires_at.map(|t| t.timestamp()), Some(1_900_000_000));
    }

    #[test]
    fn garbage_token_is_an_error() {
        assert!(matches!(decode_claims("not-a-jwt"), Err(AppError::Token(_))));
    }

    #[test]
    fn token_response_falls_back_to_expires_in() {
        let now = Utc::now();
        let token: TokenResponse = serde_json::from_value(serde_json::json!({
            "access_token": "a",
            "refresh_token": "r",
            "expires_in": 3600,
            "user": { "id": "auth-1", "email": "jane@example.com" }
        }))
        .unwrap();
        let session = token.into_session(now);
        assert_eq!(session.expires_at, Some(now + Duration::seconds(3600)));
        assert_eq!(session.user.email.as_deref(), Some("jane@example.com"));
    }
}
