use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

// Catalog row - matches the `game_catalog` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub game_id: i64,
    pub provider_id: i64,
    pub game_title: String,
    #[serde(default)]
    pub game_category: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub icon_url: Option<String>,
}

fn default_active() -> bool {
    true
}

/// Lobby sidebar categories. `Lobby` shows everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameCategory {
    Lobby,
    Sport,
    Casino,
    Slot,
    Fishing,
    FourD,
    BullBull,
}

impl GameCategory {
    pub const ALL: [GameCategory; 7] = [
        GameCategory::Lobby,
        GameCategory::Sport,
        GameCategory::Casino,
        GameCategory::Slot,
        GameCategory::Fishing,
        GameCategory::FourD,
        GameCategory::BullBull,
    ];

    /// Lower-case `game_category` values that belong to this tab.
    pub fn synonyms(&self) -> &'static [&'static str] {
        match self {
            GameCategory::Lobby => &[],
            GameCategory::Sport => &["sport", "sports"],
            GameCategory::Casino => &["casino"],
            GameCategory::Slot => &["slot", "slots"],
            GameCategory::Fishing => &["fishing"],
            GameCategory::FourD => &["4d"],
            GameCategory::BullBull => &["bull bull", "niuniu", "bull"],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GameCategory::Lobby => "All",
            GameCategory::Sport => "Sport",
            GameCategory::Casino => "Casino",
            GameCategory::Slot => "Slot",
            GameCategory::Fishing => "Fishing",
            GameCategory::FourD => "4D",
            GameCategory::BullBull => "牛牛",
        }
    }

    /// Whether a catalog category value falls under this tab.
    pub fn accepts(&self, db_category: Option<&str>) -> bool {
        if *self == GameCategory::Lobby {
            return true;
        }
        match db_category {
            Some(raw) => {
                let normalized = raw.trim().to_lowercase();
                self.synonyms().contains(&normalized.as_str())
            }
            None => false,
        }
    }
}

impl fmt::Display for GameCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GameCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        if normalized == "lobby" || normalized == "all" {
            return Ok(GameCategory::Lobby);
        }
        GameCategory::ALL
            .iter()
            .find(|c| c.synonyms().contains(&normalized.as_str()))
            .copied()
            .ok_or_else(|| AppError::invalid_data(format!("Unknown game category: {}", s)))
    }
}
