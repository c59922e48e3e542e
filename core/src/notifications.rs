//! Notification generation — scan projects and tickets, emit alert
//! records for the UI. Pure scan-and-emit, no side effects.

use crate::model::{Project, Ticket};
use crate::store::OpsState;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub severity: Severity,
    pub kind: NotificationKind,
    pub message: String,
    pub project_id: Option<String>,
    pub ticket_id: Option<String>,
    pub customer_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    FocOverdue,
    FocImminent,
    Escalation,
    BlockedProject,
    StaleContact,
    SlaBreached,
    ResponseOverdue,
    InstallToday,
}

/// Scan the whole state and emit today's alerts, ordered most severe
/// first, then newest.
pub fn generate_notifications(
    state: &OpsState,
    now: DateTime<Utc>,
    today: NaiveDate,
) -> Vec<Notification> {
    let mut out = Vec::new();

    for project in state.projects.iter().filter(|p| p.status.is_active()) {
        out.extend(project_notifications(project, now, today));
    }

    for ticket in &state.tickets {
        if ticket.resolution_overdue(now) {
            out.push(make(
                Severity::Critical,
                NotificationKind::SlaBreached,
                format!("Ticket '{}' is past its resolution SLA", ticket.subject),
                ticket,
                now,
            ));
        } else if ticket.response_overdue(now) {
            out.push(make(
                Severity::Warning,
                NotificationKind::ResponseOverdue,
                format!("Ticket '{}' has no first response and is past due", ticket.subject),
                ticket,
                now,
            ));
        }
    }

    out.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then(b.created_at.cmp(&a.created_at))
            .then(a.id.cmp(&b.id))
    });
    out
}

fn project_notifications(
    project: &Project,
    now: DateTime<Utc>,
    today: NaiveDate,
) -> Vec<Notification> {
    let mut out = Vec::new();

    let mut push = |severity, kind, message: String| {
        out.push(Notification {
            id: Uuid::new_v4().to_string(),
            severity,
            kind,
            message,
            project_id: Some(project.id.clone()),
            ticket_id: None,
            customer_id: project.customer_id.clone(),
            created_at: now,
        });
    };

    if let Some(days_past) = project.days_past_foc(today) {
        push(
            Severity::Critical,
            NotificationKind::FocOverdue,
            format!("'{}' missed its FOC date by {days_past} day(s)", project.name),
        );
    } else if let Some(foc) = project.foc_date {
        let days_left = (foc - today).num_days();
        if (0..=2).contains(&days_left) {
            push(
                Severity::Warning,
                NotificationKind::FocImminent,
                format!("'{}' hits FOC in {days_left} day(s)", project.name),
            );
        }
    }

    if project.escalated {
        let reason = project
            .escalation_reason
            .as_deref()
            .unwrap_or("no reason recorded");
        push(
            Severity::Critical,
            NotificationKind::Escalation,
            format!("'{}' is escalated ({reason})", project.name),
        );
    }

    let blockers = project.active_blockers();
    if blockers > 0 {
        push(
            Severity::Warning,
            NotificationKind::BlockedProject,
            format!("'{}' has {blockers} unresolved blocker(s)", project.name),
        );
    }

    if let Some(last) = project.last_contact {
        let days = crate::health::days_since(last, today);
        if days > 7 {
            push(
                Severity::Warning,
                NotificationKind::StaleContact,
                format!("No customer contact on '{}' for {days} days", project.name),
            );
        }
    }

    if project.scheduled_date == Some(today) {
        let who = project.assignee.as_deref().unwrap_or("unassigned");
        push(
            Severity::Info,
            NotificationKind::InstallToday,
            format!("'{}' installs today ({who})", project.name),
        );
    }

    out
}

fn make(
    severity: Severity,
    kind: NotificationKind,
    message: String,
    ticket: &Ticket,
    now: DateTime<Utc>,
) -> Notification {
    Notification {
        id: Uuid::new_v4().to_string(),
        severity,
        kind,
        message,
        project_id: ticket.project_id.clone(),
        ticket_id: Some(ticket.id.clone()),
        customer_id: ticket.customer_id.clone(),
        created_at: now,
    }
}
