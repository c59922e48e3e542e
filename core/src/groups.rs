//! Project-group rollups — one summary row per named group.

use crate::health::project_health;
use crate::model::{Project, ProjectGroup};
use crate::types::ProjectStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRollup {
    pub group_id: String,
    pub name: String,
    pub project_count: usize,
    pub completed_count: usize,
    pub total_mrc: f64,
    pub avg_health_score: f64,
    /// Members whose health is at-risk or critical (<60).
    pub at_risk_count: usize,
}

pub fn group_rollup(group: &ProjectGroup, projects: &[Project], today: NaiveDate) -> GroupRollup {
    let members: Vec<&Project> = projects
        .iter()
        .filter(|p| group.project_ids.contains(&p.id))
        .collect();

    let scores: Vec<i64> = members
        .iter()
        .map(|p| project_health(p, today).score)
        .collect();
    let avg_health_score = if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<i64>() as f64 / scores.len() as f64
    };

    GroupRollup {
        group_id: group.id.clone(),
        name: group.name.clone(),
        project_count: members.len(),
        completed_count: members
            .iter()
            .filter(|p| p.status == ProjectStatus::Completed)
            .count(),
        total_mrc: members.iter().map(|p| p.mrc).sum(),
        avg_health_score,
        at_risk_count: scores.iter().filter(|s| **s < 60).count(),
    }
}
