use serde::Serialize;
use tracing::{info, warn};

use crate::errors::Result;
use crate::handlers::account::current_user;
use crate::models::vip::{UserVipStatus, VipLevel};
use crate::services::vip::VipProgress;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct VipOverview {
    pub status: UserVipStatus,
    pub progress: VipProgress,
    pub levels: Vec<VipLevel>,
}

/// Status row for `user_id`. A missing row is created at the starting
/// level; if that write fails the default is still returned.
pub async fn vip_status(state: &AppState, user_id: &str) -> Result<UserVipStatus> {
    if let Some(status) = state.store.find_vip_status(user_id).await? {
        return Ok(status);
    }

    let status = UserVipStatus::starting(user_id);
    match state.store.insert_vip_status(&status).await {
        Ok(()) => info!("Created VIP status for {}", user_id),
        Err(e) => warn!("⚠️ Could not create VIP status for {}: {}", user_id, e),
    }
    Ok(status)
}

pub async fn vip_overview(state: &AppState) -> Result<VipOverview> {
    let user = current_user(state).await?;
    let status = vip_status(state, &user.user_id).await?;
    let levels = state.store.list_vip_levels().await?;

    Ok(VipOverview {
        progress: VipProgress::compute(&status, &levels),
        status,
        levels,
    })
}
