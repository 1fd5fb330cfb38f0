// src/errors.rs
use thiserror::Error;

/// Message shown for any failure that came from the remote store rather than
/// from the user's own input.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again later.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Please sign in to continue")]
    NotSignedIn,

    #[error("Account profile not found")]
    ProfileNotFound,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Remote store error ({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Session token error: {0}")]
    Token(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AppError {
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::Configuration(msg.into())
    }

    pub fn remote(status: u16, msg: impl Into<String>) -> Self {
        AppError::Remote {
            status,
            message: msg.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }

    /// Text to put in front of the user. Input mistakes are echoed back as-is,
    /// everything coming from the store collapses to a generic message.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::NotSignedIn => "Please sign in to continue.".to_string(),
            AppError::ProfileNotFound => "User session error. Please re-login.".to_string(),
            AppError::Configuration(msg) => format!("Configuration error: {}", msg),
            AppError::PermissionDenied(_)
            | AppError::Remote { .. }
            | AppError::HttpClient(_)
            | AppError::Json(_)
            | AppError::Token(_) => GENERIC_FAILURE.to_string(),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::HttpClient(format!("HTTP request failed: {}", err))
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AppError::Token(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        // Surface the first field message the way a form would.
        let mut fields: Vec<_> = err.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        let message = fields
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid {}", field))
                })
            })
            .next()
            .unwrap_or_else(|| "Invalid input".to_string());
        AppError::Validation(message)
    }
}

impl From<std::num::ParseFloatError> for AppError {
    fn from(_: std::num::ParseFloatError) -> Self {
        AppError::Validation("Please enter a valid amount.".to_string())
    }
}

impl From<chrono::ParseError> for AppError {
    fn from(err: chrono::ParseError) -> Self {
        AppError::Validation(format!("Invalid date: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
