use crate::errors::Result;
use crate::models::cms::{CmsContent, BANK_ALERT_KEY};
use crate::models::game::{Game, GameCategory};
use crate::services::catalog::{banners, filter_games};
use crate::state::AppState;

/// Games visible under `category`, optionally narrowed by title.
pub async fn games(state: &AppState, category: GameCategory, search: &str) -> Result<Vec<Game>> {
    let catalog = state.store.list_active_games().await?;
    Ok(filter_games(&catalog, category, search).into_iter().cloned().collect())
}

pub async fn home_banners(state: &AppState) -> Result<Vec<CmsContent>> {
    let content = state.store.list_active_content().await?;
    Ok(banners(&content).into_iter().cloned().collect())
}

/// The bank alert popup, unless it was already closed this session.
pub async fn announcement(state: &AppState) -> Result<Option<CmsContent>> {
    let alert = state.store.find_active_content(BANK_ALERT_KEY).await?;
    Ok(state.dismissed.visible(alert))
}

pub fn dismiss_announcement(state: &AppState, content_id: i64) {
    state.dismissed.dismiss(content_id);
}
