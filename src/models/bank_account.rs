use serde::{Deserialize, Serialize};
use validator::Validate;

/// Payout account saved by the user in `user_bank_accounts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserBankAccount {
    #[serde(default)]
    pub id: Option<i64>,
    pub user_id: String,
    pub bank_name: String,
    pub account_name: String,
    pub account_number: String,
    #[serde(default)]
    pub bsb: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
}

impl UserBankAccount {
    /// `Commonwealth Bank - ****6789`
    pub fn masked_label(&self) -> String {
        let digits: Vec<char> = self.account_number.chars().collect();
        let tail: String = digits[digits.len().saturating_sub(4)..].iter().collect();
        format!("{} - ****{}", self.bank_name, tail)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewBankAccount {
    #[serde(skip_deserializing)]
    pub user_id: String,

    #[validate(length(min = 1, message = "Bank name is required"))]
    pub bank_name: String,

    #[validate(length(min = 1, message = "Account name is required"))]
    pub account_name: String,

    #[validate(length(min = 1, message = "Account number is required"))]
    pub account_number: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bsb: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_all_but_last_four() {
        let account = UserBankAccount {
            id: Some(1),
            user_id: "u1".into(),
            bank_name: "Commonwealth Bank".into(),
            account_name: "Jane Doe".into(),
            account_number: "123456789".into(),
            bsb: Some("062-000".into()),
            is_verified: false,
        };
        assert_eq!(account.masked_label(), "Commonwealth Bank - ****6789");
    }

    #[test]
    fn short_numbers_are_not_padded() {
        let account = UserBankAccount {
            id: None,
            user_id: "u1".into(),
            bank_name: "ANZ".into(),
            account_name: "J".into(),
            account_number: "42".into(),
            bsb: None,
            is_verified: true,
        };
        assert_eq!(account.masked_label(), "ANZ - ****42");
    }

    #[test]
    fn empty_bank_name_fails_validation() {
        let form = NewBankAccount {
            user_id: "u1".into(),
            bank_name: "".into(),
            account_name: "Jane".into(),
            account_number: "1234".into(),
            bsb: None,
        };
        let err = crate::errors::AppError::from(form.validate().unwrap_err());
        assert_eq!(err.user_message(), "Bank name is required");
    }
}
