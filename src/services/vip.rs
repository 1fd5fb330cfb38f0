//! VIP tier progression.
//!
//! Progress towards the next tier is measured on turnover only:
//! `cumulative_turnover / next.min_cumulative_turnover`, clamped to 0..=100.

use serde::Serialize;

use crate::models::vip::{UserVipStatus, VipLevel};

/// First level above the user's current one. `levels` must be sorted by
/// `level_id` ascending, as the store returns them.
pub fn next_level<'a>(status: &UserVipStatus, levels: &'a [VipLevel]) -> Option<&'a VipLevel> {
    levels.iter().find(|l| l.level_id > status.current_level_id)
}

pub fn current_level<'a>(status: &UserVipStatus, levels: &'a [VipLevel]) -> Option<&'a VipLevel> {
    levels.iter().find(|l| l.level_id == status.current_level_id)
}

/// Percentage of the next level's turnover target already reached.
pub fn turnover_progress(turnover: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 100.0;
    }
    let pct = turnover * 100.0 / target;
    if pct.is_nan() {
        return 0.0;
    }
    pct.clamp(0.0, 100.0)
}

pub fn meets_requirements(status: &UserVipStatus, level: &VipLevel) -> bool {
    status.cumulative_deposit >= level.min_cumulative_deposit
        && status.cumulative_turnover >= level.min_cumulative_turnover
}

/// Highest level whose deposit and turnover minimums are both met.
pub fn eligible_level<'a>(status: &UserVipStatus, levels: &'a [VipLevel]) -> Option<&'a VipLevel> {
    levels
        .iter()
        .filter(|l| meets_requirements(status, l))
        .max_by_key(|l| l.level_id)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VipProgress {
    pub current_level_id: i32,
    pub current_level_name: Option<String>,
    pub next_level: Option<VipLevel>,
    pub progress_percent: f64,
    /// Turnover still required; `None` at the top level.
    pub turnover_needed: Option<f64>,
    pub daily_rebate_rate: f64,
    pub withdrawal_limit_multiplier: f64,
    /// Highest level the cumulative figures qualify for. May be ahead of
    /// `current_level_id` until the back office promotes the user.
    pub eligible_level_id: Option<i32>,
}

impl VipProgress {
    pub fn compute(status: &UserVipStatus, levels: &[VipLevel]) -> Self {
        let current = current_level(status, levels);
        let next = next_level(status, levels);

        let (progress_percent, turnover_needed) = match next {
            Some(level) => (
                turnover_progress(status.cumulative_turnover, level.min_cumulative_turnover),
                Some((level.min_cumulative_turnover - status.cumulative_turnover).max(0.0)),
            ),
            None => (100.0, None),
        };

        VipProgress {
            current_level_id: status.current_level_id,
            current_level_name: current.map(|l| l.level_name.clone()),
            next_level: next.cloned(),
            progress_percent,
            turnover_needed,
            daily_rebate_rate: current.map(|l| l.daily_rebate_rate).unwrap_or(0.0),
            withdrawal_limit_multiplier: current
                .map(|l| l.withdrawal_limit_multiplier)
                .unwrap_or(1.0),
            eligible_level_id: eligible_level(status, levels).map(|l| l.level_id),
        }
    }

    pub fn is_max_level(&self) -> bool {
        self.next_level.is_none()
    }
}
