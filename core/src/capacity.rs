//! Install capacity planning — per-installer load, a rolling daily
//! forecast, conflict detection, and rebalancing recommendations.
//!
//! Windows: "this week" runs from today through the coming Sunday
//! (however short that is), "next week" is the following Mon–Sun.

use crate::config::CapacityConfig;
use crate::model::{Customer, Project};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityReport {
    pub members: Vec<MemberLoad>,
    pub daily: Vec<DayForecast>,
    pub conflicts: Vec<ScheduleConflict>,
    pub summary: CapacitySummary,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberLoad {
    pub name: String,
    pub active_projects: usize,
    pub scheduled_this_week: usize,
    pub scheduled_next_week: usize,
    /// active_projects / max_active_per_member.
    pub utilization: f64,
    pub status: MemberStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    Available,
    Busy,
    Overloaded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayForecast {
    pub date: NaiveDate,
    pub installs: Vec<ScheduledInstall>,
    pub over_capacity: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledInstall {
    pub project_id: String,
    pub project_name: String,
    pub customer_name: Option<String>,
    pub assignee: Option<String>,
    pub slot: Option<crate::types::InstallSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConflict {
    pub date: NaiveDate,
    pub kind: ConflictKind,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    TeamOverCapacity,
    MemberDoubleBooked,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacitySummary {
    pub total_active_projects: usize,
    pub scheduled_in_horizon: usize,
    /// Team daily ceiling × horizon, minus what is already booked.
    pub available_slots: usize,
}

const WELL_BALANCED: &str = "Team capacity is well-balanced across the next two weeks.";

/// Build the full capacity picture as of `today`.
pub fn capacity_report(
    projects: &[Project],
    customers: &[Customer],
    cfg: &CapacityConfig,
    today: NaiveDate,
) -> CapacityReport {
    let customer_names: HashMap<&str, &str> = customers
        .iter()
        .map(|c| (c.id.as_str(), c.company.as_str()))
        .collect();

    let active: Vec<&Project> = projects.iter().filter(|p| p.status.is_active()).collect();

    let (week_start, week_end) = this_week(today);
    let next_week_start = week_end + Duration::days(1);
    let next_week_end = week_end + Duration::days(7);

    let members = cfg
        .roster
        .iter()
        .map(|name| {
            let mine: Vec<&&Project> = active
                .iter()
                .filter(|p| p.assignee.as_deref() == Some(name.as_str()))
                .collect();
            let in_window = |start: NaiveDate, end: NaiveDate| {
                mine.iter()
                    .filter(|p| {
                        p.scheduled_date
                            .map(|d| d >= start && d <= end)
                            .unwrap_or(false)
                    })
                    .count()
            };
            let active_projects = mine.len();
            let utilization = active_projects as f64 / cfg.max_active_per_member as f64;
            let status = if active_projects >= cfg.max_active_per_member {
                MemberStatus::Overloaded
            } else if utilization >= cfg.busy_utilization {
                MemberStatus::Busy
            } else {
                MemberStatus::Available
            };
            MemberLoad {
                name: name.clone(),
                active_projects,
                scheduled_this_week: in_window(week_start, week_end),
                scheduled_next_week: in_window(next_week_start, next_week_end),
                utilization,
                status,
            }
        })
        .collect::<Vec<_>>();

    // Rolling daily calendar.
    let mut daily = Vec::with_capacity(cfg.horizon_days as usize);
    let mut conflicts = Vec::new();
    let mut scheduled_in_horizon = 0usize;

    for offset in 0..cfg.horizon_days {
        let date = today + Duration::days(offset as i64);
        let installs: Vec<ScheduledInstall> = active
            .iter()
            .filter(|p| p.scheduled_date == Some(date))
            .map(|p| ScheduledInstall {
                project_id: p.id.clone(),
                project_name: p.name.clone(),
                customer_name: customer_names
                    .get(p.customer_id.as_str())
                    .map(|s| s.to_string()),
                assignee: p.assignee.clone(),
                slot: p.scheduled_slot,
            })
            .collect();

        scheduled_in_horizon += installs.len();
        let over_capacity = installs.len() > cfg.max_daily_installs_team;
        if over_capacity {
            conflicts.push(ScheduleConflict {
                date,
                kind: ConflictKind::TeamOverCapacity,
                detail: format!(
                    "{} installs booked; team ceiling is {}",
                    installs.len(),
                    cfg.max_daily_installs_team
                ),
            });
        }

        let mut per_assignee: HashMap<&str, usize> = HashMap::new();
        for install in &installs {
            if let Some(who) = install.assignee.as_deref() {
                *per_assignee.entry(who).or_insert(0) += 1;
            }
        }
        let mut overbooked: Vec<(&str, usize)> = per_assignee
            .into_iter()
            .filter(|(_, n)| *n > cfg.max_daily_installs_per_member)
            .collect();
        overbooked.sort();
        for (who, n) in overbooked {
            conflicts.push(ScheduleConflict {
                date,
                kind: ConflictKind::MemberDoubleBooked,
                detail: format!(
                    "{who} has {n} installs; per-member ceiling is {}",
                    cfg.max_daily_installs_per_member
                ),
            });
        }

        daily.push(DayForecast {
            date,
            installs,
            over_capacity,
        });
    }

    let capacity_total = cfg.max_daily_installs_team * cfg.horizon_days as usize;
    let summary = CapacitySummary {
        total_active_projects: active.len(),
        scheduled_in_horizon,
        available_slots: capacity_total.saturating_sub(scheduled_in_horizon),
    };

    let recommendations = build_recommendations(&members, &conflicts, &daily);

    CapacityReport {
        members,
        daily,
        conflicts,
        summary,
        recommendations,
    }
}

fn build_recommendations(
    members: &[MemberLoad],
    conflicts: &[ScheduleConflict],
    daily: &[DayForecast],
) -> Vec<String> {
    let mut recs = Vec::new();

    let overloaded: Vec<&str> = members
        .iter()
        .filter(|m| m.status == MemberStatus::Overloaded)
        .map(|m| m.name.as_str())
        .collect();
    if !overloaded.is_empty() {
        recs.push(format!(
            "Rebalance workload: {} at or over the active-project ceiling.",
            overloaded.join(", ")
        ));
    }

    if !conflicts.is_empty() {
        recs.push(format!(
            "Resolve {} scheduling conflict(s) in the next two weeks before confirming new installs.",
            conflicts.len()
        ));
    }

    if members.len() > 1 {
        let max_util = members.iter().map(|m| m.utilization).fold(0.0, f64::max);
        let min_util = members
            .iter()
            .map(|m| m.utilization)
            .fold(f64::INFINITY, f64::min);
        if max_util - min_util >= 0.5 {
            recs.push(
                "Utilization gap across installers exceeds 50%; shift new assignments to the lighter side."
                    .to_string(),
            );
        }
    }

    let weekend_installs = daily
        .iter()
        .filter(|d| matches!(d.date.weekday(), Weekday::Sat | Weekday::Sun))
        .map(|d| d.installs.len())
        .sum::<usize>();
    if weekend_installs > 0 {
        recs.push(format!(
            "{weekend_installs} weekend install(s) scheduled; confirm crew availability and overtime."
        ));
    }

    if recs.is_empty() {
        recs.push(WELL_BALANCED.to_string());
    }
    recs
}

/// Today through the coming Sunday. A Sunday "today" is a one-day week.
fn this_week(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let days_to_sunday = match today.weekday() {
        Weekday::Sun => 0,
        w => 7 - w.num_days_from_monday() as i64 - 1,
    };
    (today, today + Duration::days(days_to_sunday))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_window_ends_on_sunday() {
        // 2026-03-04 is a Wednesday; the window runs Wed..Sun.
        let wed = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
        let (start, end) = this_week(wed);
        assert_eq!(start, wed);
        assert_eq!(end.weekday(), Weekday::Sun);
        assert_eq!((end - start).num_days(), 4);

        let sun = NaiveDate::from_ymd_opt(2026, 3, 8).unwrap();
        let (s, e) = this_week(sun);
        assert_eq!(s, e);
    }
}
