use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Row of the `users` table. Created by a trigger when the auth user signs up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    #[serde(default)]
    pub supabase_auth_id: Option<String>,
    pub email: String,
    #[serde(rename = "mobileNum", default, skip_serializing_if = "Option::is_none")]
    pub mobile_num: Option<String>,
    pub username: String,
    #[serde(default)]
    pub real_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub dob: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Short id shown in the menu header: the first segment of the user id.
    pub fn display_id(&self) -> &str {
        self.user_id.split('-').next().unwrap_or(&self.user_id)
    }

    pub fn contact_number(&self) -> &str {
        self.mobile_num.as_deref().unwrap_or("Not linked")
    }
}

/// Partial edit of the profile columns. Fields left `None` are not sent, so
/// the stored value stays as it is.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(max = 100, message = "Full name is too long"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_name: Option<String>,

    #[validate(custom(function = "validate_gender"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<NaiveDate>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.real_name.is_none() && self.gender.is_none() && self.dob.is_none()
    }
}

fn validate_gender(gender: &str) -> std::result::Result<(), validator::ValidationError> {
    match gender {
        "" | "Male" | "Female" | "Other" => Ok(()),
        _ => {
            let mut err = validator::ValidationError::new("gender");
            err.message = Some("Please choose a valid gender".into());
            Err(err)
        }
    }
}
