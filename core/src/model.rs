//! Entity records — plain value data shared by every report module.
//!
//! RULE: records carry no behavior beyond cheap derived predicates
//! (active blockers, task ratios). All scoring lives in the report
//! modules; all mutation flows through the store.

use crate::types::{
    EntityId, InstallSlot, NpsCategory, Priority, ProjectStatus, TicketStatus, VipTier,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ── Project ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: EntityId,
    pub customer_id: EntityId,
    pub name: String,
    pub status: ProjectStatus,
    pub priority: Priority,
    /// Firm-order-commitment date — the contractual install deadline.
    pub foc_date: Option<NaiveDate>,
    pub scheduled_date: Option<NaiveDate>,
    pub scheduled_slot: Option<InstallSlot>,
    /// Monthly recurring charge once activated.
    pub mrc: f64,
    /// One-time install charge.
    pub nrc: f64,
    pub assignee: Option<String>,
    pub escalated: bool,
    pub escalation_reason: Option<String>,
    pub blockers: Vec<Blocker>,
    pub tasks: Vec<ProjectTask>,
    pub readiness: Vec<ReadinessTask>,
    pub last_contact: Option<DateTime<Utc>>,
    pub vip_override: Option<VipTier>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn active_blockers(&self) -> usize {
        self.blockers.iter().filter(|b| b.is_active()).count()
    }

    /// Fraction of tasks completed, or None when there are no tasks.
    pub fn task_completion(&self) -> Option<f64> {
        if self.tasks.is_empty() {
            return None;
        }
        let done = self.tasks.iter().filter(|t| t.completed).count();
        Some(done as f64 / self.tasks.len() as f64)
    }

    /// Fraction of CRITICAL readiness tasks completed, or None when
    /// no readiness task is flagged critical.
    pub fn critical_readiness_completion(&self) -> Option<f64> {
        let critical: Vec<_> = self.readiness.iter().filter(|r| r.critical).collect();
        if critical.is_empty() {
            return None;
        }
        let done = critical.iter().filter(|r| r.completed).count();
        Some(done as f64 / critical.len() as f64)
    }

    /// Whole days past the FOC date; None when no FOC is set or it is
    /// still in the future.
    pub fn days_past_foc(&self, today: NaiveDate) -> Option<i64> {
        let foc = self.foc_date?;
        let days = (today - foc).num_days();
        (days > 0).then_some(days)
    }

    pub fn is_past_foc(&self, today: NaiveDate) -> bool {
        self.days_past_foc(today).is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Blocker {
    pub id: EntityId,
    pub reason: String,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Blocker {
    /// Active iff unresolved.
    pub fn is_active(&self) -> bool {
        self.resolved_at.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectTask {
    pub id: EntityId,
    pub label: String,
    pub completed: bool,
    pub due: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReadinessTask {
    pub id: EntityId,
    pub label: String,
    pub completed: bool,
    pub critical: bool,
}

// ── Customer ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: EntityId,
    pub company: String,
    pub contacts: Vec<Contact>,
    pub vip_tier: Option<VipTier>,
    pub linkedin_url: Option<String>,
}

impl Customer {
    pub fn primary_contact(&self) -> Option<&Contact> {
        self.contacts
            .iter()
            .find(|c| c.primary)
            .or_else(|| self.contacts.first())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Contact {
    pub name: String,
    pub role: String,
    pub email: String,
    pub primary: bool,
}

/// Effective tier: project override, then customer tier, then standard.
pub fn effective_vip_tier(project: &Project, customer: Option<&Customer>) -> VipTier {
    project
        .vip_override
        .or(customer.and_then(|c| c.vip_tier))
        .unwrap_or(VipTier::Standard)
}

// ── Ticket ───────────────────────────────────────────────────────────────────

/// Support/communication record. SLA deadlines are stamped once, at
/// creation, from the priority table scaled by the effective VIP tier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ticket {
    pub id: EntityId,
    pub project_id: Option<EntityId>,
    pub customer_id: EntityId,
    pub subject: String,
    pub status: TicketStatus,
    pub priority: Priority,
    pub opened_at: DateTime<Utc>,
    pub first_response_at: Option<DateTime<Utc>>,
    pub response_due: DateTime<Utc>,
    pub resolve_due: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl Ticket {
    pub fn response_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status.is_open() && self.first_response_at.is_none() && now > self.response_due
    }

    pub fn resolution_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status.is_open() && now > self.resolve_due
    }
}

// ── NPS ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NpsResponse {
    pub id: EntityId,
    pub customer_id: EntityId,
    pub project_id: Option<EntityId>,
    /// Raw survey score, 0–10.
    pub score: u8,
    /// Always `NpsCategory::from_score(score)` — re-derived on write.
    pub category: NpsCategory,
    pub responded_at: DateTime<Utc>,
    pub followed_up: bool,
    pub comment: Option<String>,
}

// ── News alerts ──────────────────────────────────────────────────────────────

/// External news mention of a customer. Unread alerts count against
/// that customer's health score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsAlert {
    pub id: EntityId,
    pub customer_id: EntityId,
    pub headline: String,
    pub published_at: DateTime<Utc>,
    pub read: bool,
}

// ── Project groups ───────────────────────────────────────────────────────────

/// Named collection of projects under one customer, for rollup reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectGroup {
    pub id: EntityId,
    pub customer_id: EntityId,
    pub name: String,
    pub project_ids: Vec<EntityId>,
}
