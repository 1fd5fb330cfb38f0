use serde::{Deserialize, Deserializer, Serialize};
use serde_with::{serde_as, DefaultOnNull};

/// Key used for the bank-safety popup shown on launch.
pub const BANK_ALERT_KEY: &str = "bank_alert";

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CmsContent {
    pub content_id: i64,
    pub content_key: String,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub action_link: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_active", deserialize_with = "active_or_default")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

fn active_or_default<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_else(default_active))
}

/// House account shown in the deposit dialog (`depositBank` table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositBank {
    pub id: i64,
    #[serde(default)]
    pub payid: Option<String>,
    pub acc_name: String,
    #[serde(default)]
    pub acc_num: Option<String>,
    #[serde(default)]
    pub bsb: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_order_and_flag_use_defaults() {
        let row = serde_json::json!({
            "content_id": 4,
            "content_key": "promo_a",
            "title": "Weekend reload",
            "body": null,
            "sort_order": null,
            "is_active": null
        });
        let content: CmsContent = serde_json::from_value(row).unwrap();
        assert_eq!(content.sort_order, 0);
        assert!(content.is_active);
        assert!(content.body.is_none());
    }

    #[test]
    fn explicit_inactive_is_kept() {
        let row = serde_json::json!({
            "content_id": 5,
            "content_key": "promo_b",
            "title": "Retired",
            "sort_order": 3,
            "is_active": false
        });
        let content: CmsContent = serde_json::from_value(row).unwrap();
        assert_eq!(content.sort_order, 3);
        assert!(!content.is_active);
    }
}
