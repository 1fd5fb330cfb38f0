use tracing::info;

use crate::errors::{AppError, Result};
use crate::handlers::account::current_user;
use crate::models::cms::DepositBank;
use crate::models::requests::{NewDepositRequest, NewWithdrawalRequest};
use crate::services::ledger::max_withdrawable;
use crate::services::receipts::prepare_receipt;
use crate::services::requests::{parse_amount, DepositForm, WithdrawalForm};
use crate::state::AppState;

/// Receipt file picked by the user.
#[derive(Debug, Clone)]
pub struct ReceiptUpload {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Validate against the current wallet and file one pending request.
/// Nothing is written when validation fails.
pub async fn submit_withdrawal(state: &AppState, form: &WithdrawalForm) -> Result<NewWithdrawalRequest> {
    let user = current_user(state).await?;
    let wallet = state.store.find_wallet(&user.user_id).await?;

    let request = form.validate(&user.user_id, max_withdrawable(wallet.as_ref()))?;
    state.store.insert_withdrawal_request(&request).await?;

    info!(
        "✅ Withdrawal request of {:.2} to account {} submitted",
        request.amount, request.bank_account_id
    );
    Ok(request)
}

pub async fn submit_deposit(
    state: &AppState,
    form: &DepositForm,
    receipt: Option<ReceiptUpload>,
) -> Result<NewDepositRequest> {
    let user = current_user(state).await?;
    // Reject a bad amount before spending an upload on it.
    parse_amount(&form.amount)?;

    let receipt_url = match receipt {
        Some(upload) => {
            let receipt = prepare_receipt(&user.user_id, &upload.file_name, upload.data)?;
            let url = state
                .store
                .upload_object(&receipt.object_path, &receipt.content_type, receipt.body)
                .await?;
            Some(url)
        }
        None => None,
    };

    let request = form.validate(&user.user_id, receipt_url)?;
    state.store.insert_deposit_request(&request).await?;

    info!("✅ Deposit request of {:.2} submitted", request.amount);
    Ok(request)
}

/// House account the user should transfer to.
pub async fn deposit_bank_details(state: &AppState) -> Result<DepositBank> {
    state
        .store
        .find_deposit_bank(state.config.deposit_bank_id)
        .await?
        .ok_or_else(|| AppError::invalid_data("No bank details found."))
}
