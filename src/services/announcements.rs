// services/announcements.rs
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::models::cms::CmsContent;

/// Popups the user has closed during this session. Forgotten on sign-out.
#[derive(Clone, Default)]
pub struct DismissedAnnouncements {
    seen: Arc<Mutex<HashSet<i64>>>,
}

impl DismissedAnnouncements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dismiss(&self, content_id: i64) {
        self.seen
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(content_id);
    }

    pub fn is_dismissed(&self, content_id: i64) -> bool {
        self.seen
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&content_id)
    }

    /// Only show active entries that weren't closed yet.
    pub fn visible(&self, content: Option<CmsContent>) -> Option<CmsContent> {
        content.filter(|c| c.is_active && !self.is_dismissed(c.content_id))
    }

    pub fn clear(&self) {
        self.seen.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}
