use crate::models::cms::{CmsContent, BANK_ALERT_KEY};
use crate::models::game::{Game, GameCategory};

/// Games in `category` whose title contains `search` (case-insensitive).
pub fn filter_games<'a>(games: &'a [Game], category: GameCategory, search: &str) -> Vec<&'a Game> {
    let needle = search.trim().to_lowercase();
    games
        .iter()
        .filter(|g| category.accepts(g.game_category.as_deref()))
        .filter(|g| needle.is_empty() || g.game_title.to_lowercase().contains(&needle))
        .collect()
}

/// Carousel banners: active content in `sort_order`, minus the popup alert.
pub fn banners(content: &[CmsContent]) -> Vec<&CmsContent> {
    let mut rows: Vec<&CmsContent> = content
        .iter()
        .filter(|c| c.is_active && c.content_key != BANK_ALERT_KEY)
        .collect();
    rows.sort_by_key(|c| c.sort_order);
    rows
}
