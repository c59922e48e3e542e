//! All state-mutating commands.
//!
//! RULE: nothing mutates `OpsState` except `OpsStore::dispatch` applying
//! one of these. Variants are added per feature — never removed or
//! repurposed.

use crate::model::{Project, ProjectGroup};
use crate::types::{EntityId, Priority, ProjectStatus, TicketStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum OpsCommand {
    // ── Projects ──────────────────────────────────
    CreateProject {
        project: Project,
    },
    /// Whole-object replacement — the edit model of the dashboard:
    /// every field change ships the full record.
    ReplaceProject {
        project: Project,
    },
    SetProjectStatus {
        project_id: EntityId,
        status: ProjectStatus,
    },
    RecordContact {
        project_id: EntityId,
        at: DateTime<Utc>,
    },
    AddBlocker {
        project_id: EntityId,
        reason: String,
    },
    ResolveBlocker {
        project_id: EntityId,
        blocker_id: EntityId,
    },
    Escalate {
        project_id: EntityId,
        reason: String,
    },
    ClearEscalation {
        project_id: EntityId,
    },
    SetTaskCompleted {
        project_id: EntityId,
        task_id: EntityId,
        completed: bool,
    },

    // ── Tickets ───────────────────────────────────
    OpenTicket {
        customer_id: EntityId,
        project_id: Option<EntityId>,
        subject: String,
        priority: Priority,
    },
    RecordFirstResponse {
        ticket_id: EntityId,
    },
    SetTicketStatus {
        ticket_id: EntityId,
        status: TicketStatus,
    },

    // ── NPS ───────────────────────────────────────
    RecordNpsResponse {
        customer_id: EntityId,
        project_id: Option<EntityId>,
        score: u8,
        comment: Option<String>,
    },
    MarkNpsFollowedUp {
        response_id: EntityId,
    },
    RecordSurveysSent {
        count: usize,
    },

    // ── News alerts ───────────────────────────────
    MarkNewsRead {
        alert_id: EntityId,
    },

    // ── Groups ────────────────────────────────────
    CreateGroup {
        group: ProjectGroup,
    },
    AddProjectToGroup {
        group_id: EntityId,
        project_id: EntityId,
    },
}
