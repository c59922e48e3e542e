//! Operational configuration — the fixed tables the dashboard runs on.
//!
//! Everything here has a built-in default; serde derives exist so a
//! deployment can override the tables from a JSON file if it ever
//! needs to.

use crate::types::{Priority, VipTier};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OpsConfig {
    pub capacity: CapacityConfig,
    pub sla: SlaConfig,
    pub forecast: ForecastConfig,
}

// ── Capacity ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityConfig {
    /// An installer at or above this many active projects is overloaded.
    pub max_active_per_member: usize,
    /// Team-wide install ceiling for a single day.
    pub max_daily_installs_team: usize,
    /// One installer's ceiling for a single day.
    pub max_daily_installs_per_member: usize,
    /// Rolling daily-forecast window, in days.
    pub horizon_days: u32,
    /// Utilization at or above this is "busy" (below overloaded).
    pub busy_utilization: f64,
    pub roster: Vec<String>,
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            max_active_per_member: 8,
            max_daily_installs_team: 6,
            max_daily_installs_per_member: 2,
            horizon_days: 14,
            busy_utilization: 0.7,
            roster: vec![
                "Alex Rivera".to_string(),
                "Jordan Chen".to_string(),
                "Priya Natarajan".to_string(),
                "Marcus Bell".to_string(),
                "Dana Kowalski".to_string(),
                "Sam Whitfield".to_string(),
            ],
        }
    }
}

// ── SLA ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlaConfig {
    pub critical: SlaTarget,
    pub high: SlaTarget,
    pub normal: SlaTarget,
    pub low: SlaTarget,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SlaTarget {
    pub response_hours: i64,
    pub resolve_hours: i64,
}

impl Default for SlaConfig {
    fn default() -> Self {
        Self {
            critical: SlaTarget { response_hours: 1, resolve_hours: 8 },
            high: SlaTarget { response_hours: 4, resolve_hours: 24 },
            normal: SlaTarget { response_hours: 8, resolve_hours: 72 },
            low: SlaTarget { response_hours: 24, resolve_hours: 120 },
        }
    }
}

impl SlaConfig {
    pub fn target(&self, priority: Priority) -> SlaTarget {
        match priority {
            Priority::Critical => self.critical,
            Priority::High => self.high,
            Priority::Normal => self.normal,
            Priority::Low => self.low,
        }
    }

    /// VIP tiers tighten SLA clocks. Applied once, at ticket creation.
    pub fn tier_multiplier(tier: VipTier) -> f64 {
        match tier {
            VipTier::Platinum => 0.5,
            VipTier::Gold => 0.75,
            VipTier::Silver => 0.9,
            VipTier::Standard => 1.0,
        }
    }
}

// ── Revenue forecast ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    pub horizon_months: u32,
    /// Buffer from FOC date to expected activation, by status.
    pub buffer_new_days: i64,
    pub buffer_reviewing_days: i64,
    pub buffer_scheduled_days: i64,
    pub buffer_installing_days: i64,
    pub buffer_default_days: i64,
    /// Expected dates already in the past slip to today + this.
    pub slip_days: i64,
    /// Fallback horizon when a project has neither schedule nor FOC.
    pub undated_fallback_days: i64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon_months: 6,
            buffer_new_days: 14,
            buffer_reviewing_days: 10,
            buffer_scheduled_days: 0,
            buffer_installing_days: 2,
            buffer_default_days: 7,
            slip_days: 7,
            undated_fallback_days: 30,
        }
    }
}
