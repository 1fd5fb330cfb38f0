// models/requests.rs
use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle of a deposit or withdrawal request. Only `Pending` is ever
/// written by this client; the other states are set by back-office staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Approved => "Approved",
            RequestStatus::Rejected => "Rejected",
        };
        f.write_str(s)
    }
}

/// Insert payload for `deposit_requests`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewDepositRequest {
    pub user_id: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_url: Option<String>,
    pub status: RequestStatus,
}

/// Insert payload for `withdrawal_requests`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewWithdrawalRequest {
    pub user_id: String,
    pub amount: f64,
    pub bank_account_id: i64,
    pub status: RequestStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn withdrawal_payload_shape() {
        let req = NewWithdrawalRequest {
            user_id: "u1".into(),
            amount: 150.0,
            bank_account_id: 4,
            status: RequestStatus::Pending,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({
                "user_id": "u1",
                "amount": 150.0,
                "bank_account_id": 4,
                "status": "Pending"
            })
        );
    }

    #[test]
    fn deposit_without_receipt_omits_column() {
        let req = NewDepositRequest {
            user_id: "u1".into(),
            amount: 20.0,
            receipt_url: None,
            status: RequestStatus::Pending,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert!(value.get("receipt_url").is_none());
    }
}
