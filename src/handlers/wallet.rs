use serde::Serialize;
use tracing::info;

use crate::database::TransactionQuery;
use crate::errors::Result;
use crate::handlers::account::current_user;
use crate::models::transaction::Transaction;
use crate::services::history::HistoryFilter;
use crate::services::ledger::{max_withdrawable, BalanceSummary};
use crate::state::AppState;

pub const RECENT_ACTIVITY: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct WalletOverview {
    pub summary: BalanceSummary,
    pub max_withdrawable: f64,
    pub recent: Vec<Transaction>,
}

/// Balance card plus the latest activity. A user without a wallet row
/// sees zero balances.
pub async fn wallet_overview(state: &AppState) -> Result<WalletOverview> {
    let user = current_user(state).await?;
    let wallet = state.store.find_wallet(&user.user_id).await?;

    let query = TransactionQuery::for_user(&user.user_id).limit(RECENT_ACTIVITY);
    let recent = state.store.list_transactions(&query).await?;

    Ok(WalletOverview {
        summary: BalanceSummary::from_wallet(wallet.as_ref()),
        max_withdrawable: max_withdrawable(wallet.as_ref()),
        recent,
    })
}

pub async fn search_history(state: &AppState, filter: &HistoryFilter) -> Result<Vec<Transaction>> {
    let user = current_user(state).await?;
    if filter.start_date > filter.end_date {
        return Ok(Vec::new());
    }

    let rows = state.store.list_transactions(&filter.to_query(&user.user_id)).await?;
    let found = filter.apply(&rows);
    info!(
        "History {}..{} returned {} transactions",
        filter.start_date,
        filter.end_date,
        found.len()
    );
    Ok(found)
}
