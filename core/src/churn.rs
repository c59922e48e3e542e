//! Churn risk assessment — customer health is the dominant signal,
//! topped up by independent contributions from communication gaps,
//! escalations, FOC delays, blockers, trend, and dormancy.
//!
//! Risk is monotone: lower health or more escalations never lowers the
//! assessed risk. Each level maps to one fixed recommendation.

use crate::customer_health::{customer_health, HealthTrend};
use crate::health::days_since;
use crate::model::{Customer, Project};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChurnAssessment {
    pub customer_id: String,
    pub score: i64,
    pub level: ChurnLevel,
    pub health_score: i64,
    pub drivers: Vec<ChurnDriver>,
    pub recommendation: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ChurnLevel {
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl ChurnLevel {
    /// ≥70 critical, ≥50 high, ≥30 medium, ≥10 low, else none.
    pub fn from_score(score: i64) -> Self {
        match score {
            s if s >= 70 => Self::Critical,
            s if s >= 50 => Self::High,
            s if s >= 30 => Self::Medium,
            s if s >= 10 => Self::Low,
            _ => Self::None,
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            Self::Critical => {
                "Immediate executive outreach: schedule a retention call within 24 hours and assign an owner"
            }
            Self::High => {
                "Book a recovery call this week and clear the oldest blocker before the next status update"
            }
            Self::Medium => {
                "Increase touch frequency to weekly and confirm the install timeline still works for the customer"
            }
            Self::Low => "Maintain the regular cadence; flag any new blocker immediately",
            Self::None => "No action needed beyond the standard cadence",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChurnDriver {
    pub points: i64,
    pub description: String,
}

/// Assess churn risk for one customer over their projects.
pub fn churn_risk(
    customer: &Customer,
    projects: &[&Project],
    unread_news: usize,
    today: NaiveDate,
) -> ChurnAssessment {
    let health = customer_health(customer, projects, unread_news, today);

    let mut score: i64 = 0;
    let mut drivers: Vec<ChurnDriver> = Vec::new();

    let mut add = |drivers: &mut Vec<ChurnDriver>, points: i64, desc: String| {
        score += points;
        drivers.push(ChurnDriver {
            points,
            description: desc,
        });
    };

    // Health is the dominant signal.
    if health.score < 40 {
        add(
            &mut drivers,
            35,
            format!("Customer health critical ({})", health.score),
        );
    } else if health.score < 60 {
        add(
            &mut drivers,
            25,
            format!("Customer health at risk ({})", health.score),
        );
    } else if health.score < 75 {
        add(
            &mut drivers,
            10,
            format!("Customer health slipping ({})", health.score),
        );
    }

    if let Some(last) = projects.iter().filter_map(|p| p.last_contact).max() {
        let days = days_since(last, today);
        if days > 30 {
            add(
                &mut drivers,
                25,
                format!("No contact for {days} days"),
            );
        } else if days > 14 {
            add(
                &mut drivers,
                15,
                format!("Contact gap of {days} days"),
            );
        }
    }

    let escalations = projects.iter().filter(|p| p.escalated).count();
    if escalations >= 2 {
        add(
            &mut drivers,
            20,
            format!("{escalations} open escalations"),
        );
    } else if escalations == 1 {
        add(&mut drivers, 10, "One open escalation".to_string());
    }

    let delayed = projects
        .iter()
        .filter(|p| p.status.is_active() && p.is_past_foc(today))
        .count();
    if delayed >= 2 {
        add(
            &mut drivers,
            15,
            format!("{delayed} projects past FOC date"),
        );
    } else if delayed == 1 {
        add(&mut drivers, 8, "One project past FOC date".to_string());
    }

    let blockers: usize = projects.iter().map(|p| p.active_blockers()).sum();
    if blockers >= 3 {
        add(
            &mut drivers,
            15,
            format!("{blockers} unresolved blockers"),
        );
    } else if blockers >= 1 {
        add(
            &mut drivers,
            8,
            format!("{blockers} unresolved blocker(s)"),
        );
    }

    if health.trend == HealthTrend::Declining {
        add(&mut drivers, 10, "Health trend declining".to_string());
    }

    let active = projects.iter().filter(|p| p.status.is_active()).count();
    if active == 0 && !projects.is_empty() {
        add(
            &mut drivers,
            10,
            "No active projects despite install history".to_string(),
        );
    }

    let score = score.clamp(0, 100);
    let level = ChurnLevel::from_score(score);
    ChurnAssessment {
        customer_id: customer.id.clone(),
        score,
        level,
        health_score: health.score,
        drivers,
        recommendation: level.recommendation(),
    }
}
