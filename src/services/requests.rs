//! Validation for deposit and withdrawal request forms. Nothing here writes;
//! a form that fails validation never reaches the store.

use crate::errors::{AppError, Result};
use crate::models::requests::{NewDepositRequest, NewWithdrawalRequest, RequestStatus};

/// Parse the amount field: must be a positive, finite number.
pub fn parse_amount(raw: &str) -> Result<f64> {
    let amount: f64 = raw.trim().parse()?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(AppError::invalid_data("Please enter a valid amount."));
    }
    Ok(amount)
}

/// Raw withdrawal form as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct WithdrawalForm {
    pub amount: String,
    pub bank_account_id: Option<i64>,
}

impl WithdrawalForm {
    pub fn validate(&self, user_id: &str, max_withdrawable: f64) -> Result<NewWithdrawalRequest> {
        let amount = parse_amount(&self.amount)?;

        if amount > max_withdrawable {
            return Err(AppError::invalid_data(format!(
                "Insufficient funds. Max withdrawable: ${:.2}",
                max_withdrawable
            )));
        }

        let bank_account_id = self
            .bank_account_id
            .ok_or_else(|| AppError::invalid_data("Please select a bank account."))?;

        Ok(NewWithdrawalRequest {
            user_id: user_id.to_string(),
            amount,
            bank_account_id,
            status: RequestStatus::Pending,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct DepositForm {
    pub amount: String,
}

impl DepositForm {
    pub fn validate(&self, user_id: &str, receipt_url: Option<String>) -> Result<NewDepositRequest> {
        let amount = parse_amount(&self.amount)?;
        Ok(NewDepositRequest {
            user_id: user_id.to_string(),
            amount,
            receipt_url,
            status: RequestStatus::Pending,
        })
    }
}
