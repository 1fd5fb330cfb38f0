//! Balance figures derived from the wallet row.

use serde::Serialize;

use crate::models::wallet::Wallet;

/// Real plus bonus funds. A missing wallet (unprovisioned account) is zero.
pub fn display_balance(wallet: Option<&Wallet>) -> f64 {
    wallet.map(|w| w.balance + w.bonus_balance).unwrap_or(0.0)
}

/// Ceiling for withdrawals: real funds only, bonus money stays in play.
pub fn max_withdrawable(wallet: Option<&Wallet>) -> f64 {
    wallet.map(|w| w.balance.max(0.0)).unwrap_or(0.0)
}

/// Two decimals with thousands grouping: `1234.5` -> `1,234.50`.
/// Non-finite input renders as `0.00`.
pub fn format_amount(amount: f64) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, cents)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceSummary {
    pub currency_symbol: &'static str,
    pub real: f64,
    pub bonus: f64,
    pub total: f64,
    /// Both pots are zero; the chart falls back to a single grey slice.
    pub is_empty: bool,
}

impl BalanceSummary {
    pub fn from_wallet(wallet: Option<&Wallet>) -> Self {
        let real = wallet.map(|w| w.balance).unwrap_or(0.0);
        let bonus = wallet.map(|w| w.bonus_balance).unwrap_or(0.0);
        BalanceSummary {
            currency_symbol: wallet.map(|w| w.currency_symbol()).unwrap_or("A$"),
            real,
            bonus,
            total: display_balance(wallet),
            is_empty: real == 0.0 && bonus == 0.0,
        }
    }

    /// `A$1,234.50`
    pub fn display(&self) -> String {
        format!("{}{}", self.currency_symbol, format_amount(self.total))
    }
}
