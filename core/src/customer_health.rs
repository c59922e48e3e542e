//! Customer health scoring — aggregates one customer's whole book of
//! projects plus engagement and revenue signals into a single score.
//!
//! Same additive model as project health: start at 100, apply
//! independent adjustments, clamp. Trend is NOT a time series — it is
//! derived from the sign balance of the recorded factors.

use crate::health::days_since;
use crate::model::{Customer, Project};
use crate::types::{ProjectStatus, VipTier};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerHealth {
    pub customer_id: String,
    pub score: i64,
    pub level: CustomerHealthLevel,
    pub trend: HealthTrend,
    pub factors: Vec<CustomerHealthFactor>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CustomerHealthLevel {
    Excellent,
    Good,
    NeedsAttention,
    AtRisk,
    Critical,
}

impl CustomerHealthLevel {
    /// ≥90 excellent, ≥75 good, ≥60 needs-attention, ≥40 at-risk.
    pub fn from_score(score: i64) -> Self {
        match score {
            s if s >= 90 => Self::Excellent,
            s if s >= 75 => Self::Good,
            s if s >= 60 => Self::NeedsAttention,
            s if s >= 40 => Self::AtRisk,
            _ => Self::Critical,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HealthTrend {
    Improving,
    Stable,
    Declining,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerHealthFactor {
    pub delta: i64,
    pub description: String,
}

/// Score one customer across `projects` (already filtered to that
/// customer). `unread_news` is the count of unread news alerts for
/// this customer.
pub fn customer_health(
    customer: &Customer,
    projects: &[&Project],
    unread_news: usize,
    today: NaiveDate,
) -> CustomerHealth {
    let mut score: i64 = 100;
    let mut factors: Vec<CustomerHealthFactor> = Vec::new();

    let mut apply = |factors: &mut Vec<CustomerHealthFactor>, delta: i64, desc: String| {
        score += delta;
        factors.push(CustomerHealthFactor {
            delta,
            description: desc,
        });
    };

    // Communication gap across the whole book: most recent contact wins.
    let last_contact = projects.iter().filter_map(|p| p.last_contact).max();
    if let Some(last) = last_contact {
        let days = days_since(last, today);
        if days > 30 {
            apply(
                &mut factors,
                -25,
                format!("No contact across any project for {days} days"),
            );
        } else if days > 14 {
            apply(
                &mut factors,
                -15,
                format!("Last contact {days} days ago"),
            );
        } else if days > 7 {
            apply(
                &mut factors,
                -5,
                format!("Last contact {days} days ago"),
            );
        }
    }

    if unread_news > 0 {
        let delta = -(10.min(unread_news as i64 * 3));
        apply(
            &mut factors,
            delta,
            format!("{unread_news} unread news alert(s)"),
        );
    }

    if projects.is_empty() {
        apply(&mut factors, -15, "No projects on record".to_string());
    } else {
        let completed = projects
            .iter()
            .filter(|p| p.status == ProjectStatus::Completed)
            .count() as i64;
        if completed > 0 {
            let delta = 10.min(completed * 3);
            apply(
                &mut factors,
                delta,
                format!("{completed} completed install(s)"),
            );
        }
    }

    let blockers: i64 = projects.iter().map(|p| p.active_blockers() as i64).sum();
    if blockers > 0 {
        let delta = -(20.min(blockers * 8));
        apply(
            &mut factors,
            delta,
            format!("{blockers} unresolved blocker(s) across projects"),
        );
    }

    let escalated = projects.iter().filter(|p| p.escalated).count() as i64;
    if escalated > 0 {
        let delta = -(30.min(escalated * 15));
        apply(
            &mut factors,
            delta,
            format!("{escalated} escalated project(s)"),
        );
    }

    let past_foc = projects
        .iter()
        .filter(|p| p.status.is_active() && p.is_past_foc(today))
        .count() as i64;
    if past_foc > 0 {
        let delta = -(15.min(past_foc * 8));
        apply(
            &mut factors,
            delta,
            format!("{past_foc} project(s) past FOC date"),
        );
    }

    let total_mrc: f64 = projects.iter().map(|p| p.mrc).sum();
    if total_mrc >= 5000.0 {
        apply(
            &mut factors,
            10,
            format!("${total_mrc:.0} total MRC on the books"),
        );
    } else if total_mrc >= 2000.0 {
        apply(
            &mut factors,
            5,
            format!("${total_mrc:.0} total MRC on the books"),
        );
    }

    if let Some(tier) = customer.vip_tier {
        let delta = match tier {
            VipTier::Platinum => 10,
            VipTier::Gold => 7,
            VipTier::Silver => 4,
            VipTier::Standard => 0,
        };
        if delta > 0 {
            apply(&mut factors, delta, format!("{tier:?} tier customer"));
        }
    }

    let negatives = factors.iter().filter(|f| f.delta < 0).count();
    let positives = factors.iter().filter(|f| f.delta > 0).count();
    let trend = if negatives > positives + 1 {
        HealthTrend::Declining
    } else if positives > negatives + 1 {
        HealthTrend::Improving
    } else {
        HealthTrend::Stable
    };

    let score = score.clamp(0, 100);
    CustomerHealth {
        customer_id: customer.id.clone(),
        score,
        level: CustomerHealthLevel::from_score(score),
        trend,
        factors,
    }
}
