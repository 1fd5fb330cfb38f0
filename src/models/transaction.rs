// models/transaction.rs
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

/// Ledger row from `transactions`. Append-only, never written by this client.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: i64,
    pub user_id: String,
    pub transaction_type: TransactionType,
    /// Signed: credits are positive, debits negative.
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_ref_id: Option<String>,
    pub status: TransactionStatus,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn is_credit(&self) -> bool {
        self.amount > 0.0
    }

    /// `+12.50` for credits, `-3.00` for debits.
    pub fn signed_amount(&self) -> String {
        if self.is_credit() {
            format!("+{:.2}", self.amount)
        } else {
            format!("{:.2}", self.amount)
        }
    }
}

/// The ledger's type column is an open set; the known kinds get variants and
/// everything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Bet,
    Bonus,
    Rebate,
    Other(String),
}

impl TransactionType {
    /// Kinds offered in the history type picker.
    pub const KNOWN: [TransactionType; 5] = [
        TransactionType::Deposit,
        TransactionType::Withdrawal,
        TransactionType::Bet,
        TransactionType::Bonus,
        TransactionType::Rebate,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            TransactionType::Deposit => "Deposit",
            TransactionType::Withdrawal => "Withdrawal",
            TransactionType::Bet => "Bet",
            TransactionType::Bonus => "Bonus",
            TransactionType::Rebate => "Rebate",
            TransactionType::Other(s) => s,
        }
    }
}

impl From<String> for TransactionType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Deposit" => TransactionType::Deposit,
            "Withdrawal" => TransactionType::Withdrawal,
            "Bet" => TransactionType::Bet,
            "Bonus" => TransactionType::Bonus,
            "Rebate" => TransactionType::Rebate,
            _ => TransactionType::Other(s),
        }
    }
}

impl From<TransactionType> for String {
    fn from(t: TransactionType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionStatus {
    Pending,
    Success,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "Pending",
            TransactionStatus::Success => "Success",
            TransactionStatus::Failed => "Failed",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
