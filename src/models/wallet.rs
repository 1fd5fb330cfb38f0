use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

/// Row of `user_wallet`. Balances are moved by back-office processes only.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    pub user_id: String,

    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub balance: f64,

    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub bonus_balance: f64,

    #[serde(default = "default_currency")]
    pub currency_code: String,
}

fn default_currency() -> String {
    "AUD".to_string()
}

impl Wallet {
    pub fn currency_symbol(&self) -> &'static str {
        if self.currency_code == "USD" {
            "$"
        } else {
            "A$"
        }
    }
}
