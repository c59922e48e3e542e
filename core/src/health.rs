//! Project health scoring — per-project score, level, and factor breakdown.
//!
//! Additive model: start at 100, apply independent deductions for FOC
//! pressure, contact gaps, blockers, task progress, readiness, and
//! escalation, then a small momentum bonus for confirmed/installing.
//! Completed projects short-circuit to a perfect score.
//!
//! Every adjustment is recorded as a factor with a human-readable
//! description — the UI renders these verbatim.

use crate::model::Project;
use crate::types::ProjectStatus;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectHealth {
    pub project_id: String,
    pub score: i64,
    pub level: HealthLevel,
    pub factors: Vec<HealthFactor>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HealthLevel {
    Healthy,
    NeedsAttention,
    AtRisk,
    Critical,
}

impl HealthLevel {
    /// ≥80 healthy, ≥60 needs-attention, ≥40 at-risk, else critical.
    pub fn from_score(score: i64) -> Self {
        match score {
            s if s >= 80 => Self::Healthy,
            s if s >= 60 => Self::NeedsAttention,
            s if s >= 40 => Self::AtRisk,
            _ => Self::Critical,
        }
    }
}

/// One scored adjustment. Negative delta is a deduction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthFactor {
    pub delta: i64,
    pub description: String,
}

impl HealthFactor {
    fn new(delta: i64, description: impl Into<String>) -> Self {
        Self {
            delta,
            description: description.into(),
        }
    }
}

/// Score one project as of `today`. Total over its input domain —
/// missing dates and empty task lists simply contribute no factor.
pub fn project_health(project: &Project, today: NaiveDate) -> ProjectHealth {
    if project.status == ProjectStatus::Completed {
        return ProjectHealth {
            project_id: project.id.clone(),
            score: 100,
            level: HealthLevel::Healthy,
            factors: vec![HealthFactor::new(0, "Project completed")],
        };
    }

    let mut factors = Vec::new();
    let mut score: i64 = 100;

    let mut apply = |factors: &mut Vec<HealthFactor>, delta: i64, desc: String| {
        score += delta;
        factors.push(HealthFactor::new(delta, desc));
    };

    // FOC pressure: overdue bites hardest, then the final 0–2 day
    // crunch, then the 3–5 day approach.
    if let Some(foc) = project.foc_date {
        let days_left = (foc - today).num_days();
        if days_left < 0 {
            let days_past = -days_left;
            let delta = -(30.min(days_past * 5));
            apply(
                &mut factors,
                delta,
                format!("FOC date missed by {days_past} day(s)"),
            );
        } else if days_left <= 2 {
            apply(
                &mut factors,
                -15,
                format!("FOC date in {days_left} day(s)"),
            );
        } else if days_left <= 5 {
            apply(
                &mut factors,
                -5,
                format!("FOC date approaching in {days_left} day(s)"),
            );
        }
    }

    // Contact recency. A never-contacted project carries no factor.
    if let Some(last_contact) = project.last_contact {
        let days = days_since(last_contact, today);
        if days > 7 {
            let delta = -(25.min((days - 7) * 5));
            apply(
                &mut factors,
                delta,
                format!("No customer contact for {days} days"),
            );
        } else if days >= 4 {
            apply(
                &mut factors,
                -5,
                format!("Customer contact {days} days ago"),
            );
        }
    }

    let blockers = project.active_blockers() as i64;
    if blockers > 0 {
        let delta = -(20.min(blockers * 10));
        apply(
            &mut factors,
            delta,
            format!("{blockers} unresolved blocker(s)"),
        );
    }

    if let Some(ratio) = project.task_completion() {
        let pct = (ratio * 100.0).round() as i64;
        let delta = if ratio < 0.25 {
            -15
        } else if ratio < 0.5 {
            -10
        } else if ratio < 0.75 {
            -5
        } else {
            0
        };
        if delta != 0 {
            apply(&mut factors, delta, format!("Only {pct}% of tasks complete"));
        }
    }

    if let Some(ratio) = project.critical_readiness_completion() {
        if ratio < 0.5 {
            apply(
                &mut factors,
                -15,
                "Less than half of critical readiness tasks complete".to_string(),
            );
        } else if ratio < 1.0 {
            apply(
                &mut factors,
                -8,
                "Critical readiness tasks outstanding".to_string(),
            );
        }
    }

    if project.escalated {
        let desc = match &project.escalation_reason {
            Some(reason) => format!("Escalated: {reason}"),
            None => "Escalated".to_string(),
        };
        apply(&mut factors, -10, desc);
    }

    // Momentum bonus once the install is locked in.
    if matches!(
        project.status,
        ProjectStatus::Confirmed | ProjectStatus::Installing
    ) {
        apply(
            &mut factors,
            5,
            format!("Status {} — install locked in", project.status.label()),
        );
    }

    let score = score.clamp(0, 100);
    ProjectHealth {
        project_id: project.id.clone(),
        score,
        level: HealthLevel::from_score(score),
        factors,
    }
}

pub(crate) fn days_since(moment: DateTime<Utc>, today: NaiveDate) -> i64 {
    (today - moment.date_naive()).num_days().max(0)
}
