//! Events emitted by the store when commands apply.
//!
//! Consumers (the UI, the event log) see state changes ONLY through
//! these. Variants are added per feature — never removed or reordered.

use crate::types::{EntityId, Priority, ProjectStatus, TicketStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OpsEvent {
    ProjectCreated {
        project_id: EntityId,
        customer_id: EntityId,
    },
    ProjectReplaced {
        project_id: EntityId,
    },
    ProjectStatusChanged {
        project_id: EntityId,
        from: ProjectStatus,
        to: ProjectStatus,
    },
    ContactRecorded {
        project_id: EntityId,
        at: DateTime<Utc>,
    },
    BlockerAdded {
        project_id: EntityId,
        blocker_id: EntityId,
        reason: String,
    },
    BlockerResolved {
        project_id: EntityId,
        blocker_id: EntityId,
    },
    ProjectEscalated {
        project_id: EntityId,
        reason: String,
    },
    EscalationCleared {
        project_id: EntityId,
    },
    TaskUpdated {
        project_id: EntityId,
        task_id: EntityId,
        completed: bool,
    },
    TicketOpened {
        ticket_id: EntityId,
        customer_id: EntityId,
        priority: Priority,
        response_due: DateTime<Utc>,
        resolve_due: DateTime<Utc>,
    },
    TicketFirstResponse {
        ticket_id: EntityId,
        at: DateTime<Utc>,
    },
    TicketStatusChanged {
        ticket_id: EntityId,
        from: TicketStatus,
        to: TicketStatus,
    },
    NpsResponseRecorded {
        response_id: EntityId,
        customer_id: EntityId,
        score: u8,
    },
    NpsFollowedUp {
        response_id: EntityId,
    },
    SurveysSent {
        count: usize,
    },
    NewsAlertRead {
        alert_id: EntityId,
    },
    GroupCreated {
        group_id: EntityId,
    },
    GroupMemberAdded {
        group_id: EntityId,
        project_id: EntityId,
    },
}

/// Extract a stable string name from an event variant, for the
/// event_type column of the log.
pub fn event_type_name(event: &OpsEvent) -> &'static str {
    match event {
        OpsEvent::ProjectCreated { .. } => "project_created",
        OpsEvent::ProjectReplaced { .. } => "project_replaced",
        OpsEvent::ProjectStatusChanged { .. } => "project_status_changed",
        OpsEvent::ContactRecorded { .. } => "contact_recorded",
        OpsEvent::BlockerAdded { .. } => "blocker_added",
        OpsEvent::BlockerResolved { .. } => "blocker_resolved",
        OpsEvent::ProjectEscalated { .. } => "project_escalated",
        OpsEvent::EscalationCleared { .. } => "escalation_cleared",
        OpsEvent::TaskUpdated { .. } => "task_updated",
        OpsEvent::TicketOpened { .. } => "ticket_opened",
        OpsEvent::TicketFirstResponse { .. } => "ticket_first_response",
        OpsEvent::TicketStatusChanged { .. } => "ticket_status_changed",
        OpsEvent::NpsResponseRecorded { .. } => "nps_response_recorded",
        OpsEvent::NpsFollowedUp { .. } => "nps_followed_up",
        OpsEvent::SurveysSent { .. } => "surveys_sent",
        OpsEvent::NewsAlertRead { .. } => "news_alert_read",
        OpsEvent::GroupCreated { .. } => "group_created",
        OpsEvent::GroupMemberAdded { .. } => "group_member_added",
    }
}

/// One appended entry in the store's action log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub seq: u64,
    pub recorded_at: DateTime<Utc>,
    pub event_type: String,
    /// JSON-serialized OpsEvent.
    pub payload: String,
}
