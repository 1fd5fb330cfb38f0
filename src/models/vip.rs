use serde::{Deserialize, Deserializer, Serialize};
use serde_with::{serde_as, DefaultOnNull};

/// Reference row from `vip_levels`, read ordered by `level_id`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VipLevel {
    pub level_id: i32,
    pub level_name: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub min_cumulative_deposit: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub min_cumulative_turnover: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub daily_rebate_rate: f64,
    #[serde(default = "default_multiplier", deserialize_with = "multiplier_or_default")]
    pub withdrawal_limit_multiplier: f64,
}

fn default_multiplier() -> f64 {
    1.0
}

fn multiplier_or_default<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_else(default_multiplier))
}

/// Row from `user_vip_status`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserVipStatus {
    pub user_id: String,
    pub current_level_id: i32,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub cumulative_deposit: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub cumulative_turnover: f64,
}

impl UserVipStatus {
    pub const STARTING_LEVEL: i32 = 1;

    /// Record used when the user has no status row yet.
    pub fn starting(user_id: impl Into<String>) -> Self {
        UserVipStatus {
            user_id: user_id.into(),
            current_level_id: Self::STARTING_LEVEL,
            cumulative_deposit: 0.0,
            cumulative_turnover: 0.0,
        }
    }
}
