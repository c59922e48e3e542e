//! Revenue forecasting — MRC totals, at-risk revenue, and a monthly
//! activation forecast over the next six calendar months.
//!
//! Expected activation: the scheduled install date when one exists,
//! otherwise FOC date plus a status-dependent buffer. Dates already in
//! the past slip forward rather than forecasting into history.

use crate::config::ForecastConfig;
use crate::model::{Customer, Project};
use crate::types::ProjectStatus;
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueForecast {
    pub total_sold_mrc: f64,
    pub activated_mrc: f64,
    pub pending_mrc: f64,
    pub at_risk_mrc: f64,
    /// round(activated / total_sold × 100); 0 when nothing is sold.
    pub activation_rate: i64,
    pub months: Vec<MonthForecast>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthForecast {
    pub year: i32,
    pub month: u32,
    /// e.g. "Mar 2026".
    pub label: String,
    pub entries: Vec<ForecastEntry>,
    pub forecast_mrc: f64,
    /// Running activated MRC, seeded from the current activated total.
    pub cumulative_mrc: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub project_id: String,
    pub project_name: String,
    pub customer_name: Option<String>,
    pub mrc: f64,
    pub expected_date: NaiveDate,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// Forecast MRC activation as of `today`.
pub fn revenue_forecast(
    projects: &[Project],
    customers: &[Customer],
    cfg: &ForecastConfig,
    today: NaiveDate,
) -> RevenueForecast {
    let customer_names: HashMap<&str, &str> = customers
        .iter()
        .map(|c| (c.id.as_str(), c.company.as_str()))
        .collect();

    let total_sold_mrc: f64 = projects.iter().map(|p| p.mrc).sum();
    let activated_mrc: f64 = projects
        .iter()
        .filter(|p| p.status == ProjectStatus::Completed)
        .map(|p| p.mrc)
        .sum();
    let pending: Vec<&Project> = projects.iter().filter(|p| p.status.is_active()).collect();
    let pending_mrc: f64 = pending.iter().map(|p| p.mrc).sum();
    let at_risk_mrc: f64 = pending
        .iter()
        .filter(|p| p.escalated || p.is_past_foc(today))
        .map(|p| p.mrc)
        .sum();

    let activation_rate = if total_sold_mrc > 0.0 {
        (activated_mrc / total_sold_mrc * 100.0).round() as i64
    } else {
        0
    };

    // Month buckets start at the current calendar month.
    let mut months: Vec<MonthForecast> = (0..cfg.horizon_months)
        .map(|i| {
            let (year, month) = add_months(today.year(), today.month(), i);
            MonthForecast {
                year,
                month,
                label: format!("{} {year}", month_abbrev(month)),
                entries: Vec::new(),
                forecast_mrc: 0.0,
                cumulative_mrc: 0.0,
            }
        })
        .collect();

    for project in &pending {
        let expected = expected_activation(project, cfg, today);
        if let Some(bucket) = months
            .iter_mut()
            .find(|m| m.year == expected.year() && m.month == expected.month())
        {
            bucket.forecast_mrc += project.mrc;
            bucket.entries.push(ForecastEntry {
                project_id: project.id.clone(),
                project_name: project.name.clone(),
                customer_name: customer_names
                    .get(project.customer_id.as_str())
                    .map(|s| s.to_string()),
                mrc: project.mrc,
                expected_date: expected,
                confidence: confidence(project, today),
            });
        }
    }

    let mut running = activated_mrc;
    for month in &mut months {
        month.entries.sort_by(|a, b| a.expected_date.cmp(&b.expected_date));
        running += month.forecast_mrc;
        month.cumulative_mrc = running;
    }

    RevenueForecast {
        total_sold_mrc,
        activated_mrc,
        pending_mrc,
        at_risk_mrc,
        activation_rate,
        months,
    }
}

/// Scheduled date, else FOC + status buffer, else a fixed fallback;
/// never in the past — stale dates slip to today + slip_days.
pub fn expected_activation(project: &Project, cfg: &ForecastConfig, today: NaiveDate) -> NaiveDate {
    let raw = if let Some(scheduled) = project.scheduled_date {
        scheduled
    } else if let Some(foc) = project.foc_date {
        foc + Duration::days(status_buffer_days(project.status, cfg))
    } else {
        today + Duration::days(cfg.undated_fallback_days)
    };

    if raw < today {
        today + Duration::days(cfg.slip_days)
    } else {
        raw
    }
}

fn status_buffer_days(status: ProjectStatus, cfg: &ForecastConfig) -> i64 {
    match status {
        ProjectStatus::New => cfg.buffer_new_days,
        ProjectStatus::Reviewing => cfg.buffer_reviewing_days,
        ProjectStatus::Scheduled | ProjectStatus::Confirmed => cfg.buffer_scheduled_days,
        ProjectStatus::Installing => cfg.buffer_installing_days,
        ProjectStatus::Completed => cfg.buffer_default_days,
    }
}

/// Low when anything is actively wrong, high once the install is
/// locked in, medium otherwise.
pub fn confidence(project: &Project, today: NaiveDate) -> Confidence {
    if project.escalated || project.active_blockers() > 0 || project.is_past_foc(today) {
        Confidence::Low
    } else if matches!(
        project.status,
        ProjectStatus::Confirmed | ProjectStatus::Installing
    ) {
        Confidence::High
    } else {
        Confidence::Medium
    }
}

fn add_months(year: i32, month: u32, offset: u32) -> (i32, u32) {
    let zero_based = (month - 1) + offset;
    (year + (zero_based / 12) as i32, zero_based % 12 + 1)
}

fn month_abbrev(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        _ => "Dec",
    }
}
