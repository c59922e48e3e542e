//! The application store — one mutable document behind a single-writer
//! API.
//!
//! RULES:
//!   - Only `dispatch` mutates `OpsState`. Reads are borrowed accessors.
//!   - Every applied command appends its events to the action log.
//!   - Last dispatched command wins; there is no concurrent mutation.
//!
//! Report functions stay pure; the convenience wrappers here only bind
//! them to the current state and clock.

use crate::{
    capacity::{capacity_report, CapacityReport},
    churn::{churn_risk, ChurnAssessment},
    clock::OpsClock,
    command::OpsCommand,
    config::{OpsConfig, SlaConfig},
    customer_health::{customer_health, CustomerHealth},
    error::{OpsError, OpsResult},
    event::{event_type_name, EventLogEntry, OpsEvent},
    groups::{group_rollup, GroupRollup},
    health::{project_health, ProjectHealth},
    model::{
        effective_vip_tier, Blocker, Customer, NewsAlert, NpsResponse, Project, ProjectGroup,
        Ticket,
    },
    notifications::{generate_notifications, Notification},
    nps::{nps_report, NpsReport},
    revenue::{revenue_forecast, RevenueForecast},
    types::{EntityId, NpsCategory, TicketStatus},
};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The whole in-memory document. Serialized as-is into the snapshot
/// blob.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct OpsState {
    pub projects: Vec<Project>,
    pub customers: Vec<Customer>,
    pub tickets: Vec<Ticket>,
    pub nps_responses: Vec<NpsResponse>,
    pub surveys_sent: usize,
    pub news_alerts: Vec<NewsAlert>,
    pub groups: Vec<ProjectGroup>,
}

pub struct OpsStore {
    state: OpsState,
    config: OpsConfig,
    clock: OpsClock,
    event_log: Vec<EventLogEntry>,
    next_seq: u64,
}

impl OpsStore {
    pub fn new(state: OpsState, config: OpsConfig, clock: OpsClock) -> Self {
        Self {
            state,
            config,
            clock,
            event_log: Vec::new(),
            next_seq: 0,
        }
    }

    pub fn state(&self) -> &OpsState {
        &self.state
    }

    pub fn config(&self) -> &OpsConfig {
        &self.config
    }

    pub fn clock(&self) -> &OpsClock {
        &self.clock
    }

    pub fn event_log(&self) -> &[EventLogEntry] {
        &self.event_log
    }

    // ── Reads ──────────────────────────────────────────────────

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.state.projects.iter().find(|p| p.id == id)
    }

    pub fn customer(&self, id: &str) -> Option<&Customer> {
        self.state.customers.iter().find(|c| c.id == id)
    }

    pub fn ticket(&self, id: &str) -> Option<&Ticket> {
        self.state.tickets.iter().find(|t| t.id == id)
    }

    pub fn projects_for_customer(&self, customer_id: &str) -> Vec<&Project> {
        self.state
            .projects
            .iter()
            .filter(|p| p.customer_id == customer_id)
            .collect()
    }

    pub fn unread_news_count(&self, customer_id: &str) -> usize {
        self.state
            .news_alerts
            .iter()
            .filter(|a| a.customer_id == customer_id && !a.read)
            .count()
    }

    // ── Dispatch ───────────────────────────────────────────────

    /// Apply one command. Returns the events it produced, which are
    /// also appended to the action log.
    pub fn dispatch(&mut self, command: OpsCommand) -> OpsResult<Vec<OpsEvent>> {
        let events = self.apply(command)?;
        let now = self.clock.now();
        for event in &events {
            let entry = EventLogEntry {
                seq: self.next_seq,
                recorded_at: now,
                event_type: event_type_name(event).to_string(),
                payload: serde_json::to_string(event)?,
            };
            log::info!("dispatch: {} (seq={})", entry.event_type, entry.seq);
            self.event_log.push(entry);
            self.next_seq += 1;
        }
        Ok(events)
    }

    fn apply(&mut self, command: OpsCommand) -> OpsResult<Vec<OpsEvent>> {
        match command {
            OpsCommand::CreateProject { project } => {
                if self.project(&project.id).is_some() {
                    return Err(OpsError::InvalidCommand(format!(
                        "project '{}' already exists",
                        project.id
                    )));
                }
                let event = OpsEvent::ProjectCreated {
                    project_id: project.id.clone(),
                    customer_id: project.customer_id.clone(),
                };
                self.state.projects.push(project);
                Ok(vec![event])
            }

            OpsCommand::ReplaceProject { project } => {
                let slot = self
                    .state
                    .projects
                    .iter_mut()
                    .find(|p| p.id == project.id)
                    .ok_or_else(|| OpsError::not_found("project", &project.id))?;
                let event = OpsEvent::ProjectReplaced {
                    project_id: project.id.clone(),
                };
                *slot = project;
                Ok(vec![event])
            }

            OpsCommand::SetProjectStatus { project_id, status } => {
                let project = self.project_mut(&project_id)?;
                let from = project.status;
                project.status = status;
                Ok(vec![OpsEvent::ProjectStatusChanged {
                    project_id,
                    from,
                    to: status,
                }])
            }

            OpsCommand::RecordContact { project_id, at } => {
                let project = self.project_mut(&project_id)?;
                project.last_contact = Some(at);
                Ok(vec![OpsEvent::ContactRecorded { project_id, at }])
            }

            OpsCommand::AddBlocker { project_id, reason } => {
                let now = self.clock.now();
                let blocker = Blocker {
                    id: Uuid::new_v4().to_string(),
                    reason: reason.clone(),
                    created_at: now,
                    resolved_at: None,
                };
                let blocker_id = blocker.id.clone();
                let project = self.project_mut(&project_id)?;
                project.blockers.push(blocker);
                Ok(vec![OpsEvent::BlockerAdded {
                    project_id,
                    blocker_id,
                    reason,
                }])
            }

            OpsCommand::ResolveBlocker {
                project_id,
                blocker_id,
            } => {
                let now = self.clock.now();
                let project = self.project_mut(&project_id)?;
                let blocker = project
                    .blockers
                    .iter_mut()
                    .find(|b| b.id == blocker_id)
                    .ok_or_else(|| OpsError::not_found("blocker", &blocker_id))?;
                blocker.resolved_at = Some(now);
                Ok(vec![OpsEvent::BlockerResolved {
                    project_id,
                    blocker_id,
                }])
            }

            OpsCommand::Escalate { project_id, reason } => {
                let project = self.project_mut(&project_id)?;
                project.escalated = true;
                project.escalation_reason = Some(reason.clone());
                Ok(vec![OpsEvent::ProjectEscalated { project_id, reason }])
            }

            OpsCommand::ClearEscalation { project_id } => {
                let project = self.project_mut(&project_id)?;
                project.escalated = false;
                project.escalation_reason = None;
                Ok(vec![OpsEvent::EscalationCleared { project_id }])
            }

            OpsCommand::SetTaskCompleted {
                project_id,
                task_id,
                completed,
            } => {
                let project = self.project_mut(&project_id)?;
                let task = project
                    .tasks
                    .iter_mut()
                    .find(|t| t.id == task_id)
                    .ok_or_else(|| OpsError::not_found("task", &task_id))?;
                task.completed = completed;
                Ok(vec![OpsEvent::TaskUpdated {
                    project_id,
                    task_id,
                    completed,
                }])
            }

            OpsCommand::OpenTicket {
                customer_id,
                project_id,
                subject,
                priority,
            } => {
                if self.customer(&customer_id).is_none() {
                    return Err(OpsError::not_found("customer", &customer_id));
                }
                // SLA clocks are stamped once, here, scaled by the
                // effective VIP tier.
                let tier = match &project_id {
                    Some(pid) => {
                        let project = self
                            .project(pid)
                            .ok_or_else(|| OpsError::not_found("project", pid))?;
                        effective_vip_tier(project, self.customer(&customer_id))
                    }
                    None => self
                        .customer(&customer_id)
                        .and_then(|c| c.vip_tier)
                        .unwrap_or(crate::types::VipTier::Standard),
                };
                let target = self.config.sla.target(priority);
                let mult = SlaConfig::tier_multiplier(tier);
                let now = self.clock.now();
                let response_due =
                    now + Duration::minutes((target.response_hours as f64 * mult * 60.0) as i64);
                let resolve_due =
                    now + Duration::minutes((target.resolve_hours as f64 * mult * 60.0) as i64);

                let ticket = Ticket {
                    id: Uuid::new_v4().to_string(),
                    project_id,
                    customer_id: customer_id.clone(),
                    subject,
                    status: TicketStatus::Open,
                    priority,
                    opened_at: now,
                    first_response_at: None,
                    response_due,
                    resolve_due,
                    closed_at: None,
                };
                let event = OpsEvent::TicketOpened {
                    ticket_id: ticket.id.clone(),
                    customer_id,
                    priority,
                    response_due,
                    resolve_due,
                };
                self.state.tickets.push(ticket);
                Ok(vec![event])
            }

            OpsCommand::RecordFirstResponse { ticket_id } => {
                let now = self.clock.now();
                let ticket = self.ticket_mut(&ticket_id)?;
                if ticket.first_response_at.is_none() {
                    ticket.first_response_at = Some(now);
                }
                Ok(vec![OpsEvent::TicketFirstResponse {
                    ticket_id,
                    at: now,
                }])
            }

            OpsCommand::SetTicketStatus { ticket_id, status } => {
                let now = self.clock.now();
                let ticket = self.ticket_mut(&ticket_id)?;
                let from = ticket.status;
                ticket.status = status;
                ticket.closed_at = match status {
                    TicketStatus::Closed | TicketStatus::Resolved => Some(now),
                    _ => None,
                };
                Ok(vec![OpsEvent::TicketStatusChanged {
                    ticket_id,
                    from,
                    to: status,
                }])
            }

            OpsCommand::RecordNpsResponse {
                customer_id,
                project_id,
                score,
                comment,
            } => {
                if self.customer(&customer_id).is_none() {
                    return Err(OpsError::not_found("customer", &customer_id));
                }
                let score = score.min(10);
                let response = NpsResponse {
                    id: Uuid::new_v4().to_string(),
                    customer_id: customer_id.clone(),
                    project_id,
                    score,
                    // Category is always derived, never taken on trust.
                    category: NpsCategory::from_score(score),
                    responded_at: self.clock.now(),
                    followed_up: false,
                    comment,
                };
                let event = OpsEvent::NpsResponseRecorded {
                    response_id: response.id.clone(),
                    customer_id,
                    score,
                };
                self.state.nps_responses.push(response);
                Ok(vec![event])
            }

            OpsCommand::MarkNpsFollowedUp { response_id } => {
                let response = self
                    .state
                    .nps_responses
                    .iter_mut()
                    .find(|r| r.id == response_id)
                    .ok_or_else(|| OpsError::not_found("nps response", &response_id))?;
                response.followed_up = true;
                Ok(vec![OpsEvent::NpsFollowedUp { response_id }])
            }

            OpsCommand::RecordSurveysSent { count } => {
                self.state.surveys_sent += count;
                Ok(vec![OpsEvent::SurveysSent { count }])
            }

            OpsCommand::MarkNewsRead { alert_id } => {
                let alert = self
                    .state
                    .news_alerts
                    .iter_mut()
                    .find(|a| a.id == alert_id)
                    .ok_or_else(|| OpsError::not_found("news alert", &alert_id))?;
                alert.read = true;
                Ok(vec![OpsEvent::NewsAlertRead { alert_id }])
            }

            OpsCommand::CreateGroup { group } => {
                let event = OpsEvent::GroupCreated {
                    group_id: group.id.clone(),
                };
                self.state.groups.push(group);
                Ok(vec![event])
            }

            OpsCommand::AddProjectToGroup {
                group_id,
                project_id,
            } => {
                if self.project(&project_id).is_none() {
                    return Err(OpsError::not_found("project", &project_id));
                }
                let group = self
                    .state
                    .groups
                    .iter_mut()
                    .find(|g| g.id == group_id)
                    .ok_or_else(|| OpsError::not_found("group", &group_id))?;
                if !group.project_ids.contains(&project_id) {
                    group.project_ids.push(project_id.clone());
                }
                Ok(vec![OpsEvent::GroupMemberAdded {
                    group_id,
                    project_id,
                }])
            }
        }
    }

    fn project_mut(&mut self, id: &str) -> OpsResult<&mut Project> {
        self.state
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| OpsError::not_found("project", id))
    }

    fn ticket_mut(&mut self, id: &str) -> OpsResult<&mut Ticket> {
        self.state
            .tickets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| OpsError::not_found("ticket", id))
    }

    // ── Report wrappers (pure functions bound to current state) ─

    pub fn project_health_for(&self, project_id: &str) -> OpsResult<ProjectHealth> {
        let project = self
            .project(project_id)
            .ok_or_else(|| OpsError::not_found("project", project_id))?;
        Ok(project_health(project, self.clock.today()))
    }

    pub fn all_project_health(&self) -> Vec<ProjectHealth> {
        let today = self.clock.today();
        self.state
            .projects
            .iter()
            .map(|p| project_health(p, today))
            .collect()
    }

    pub fn customer_health_for(&self, customer_id: &str) -> OpsResult<CustomerHealth> {
        let customer = self
            .customer(customer_id)
            .ok_or_else(|| OpsError::not_found("customer", customer_id))?;
        let projects = self.projects_for_customer(customer_id);
        Ok(customer_health(
            customer,
            &projects,
            self.unread_news_count(customer_id),
            self.clock.today(),
        ))
    }

    pub fn churn_risk_for(&self, customer_id: &str) -> OpsResult<ChurnAssessment> {
        let customer = self
            .customer(customer_id)
            .ok_or_else(|| OpsError::not_found("customer", customer_id))?;
        let projects = self.projects_for_customer(customer_id);
        Ok(churn_risk(
            customer,
            &projects,
            self.unread_news_count(customer_id),
            self.clock.today(),
        ))
    }

    pub fn capacity(&self) -> CapacityReport {
        capacity_report(
            &self.state.projects,
            &self.state.customers,
            &self.config.capacity,
            self.clock.today(),
        )
    }

    pub fn revenue(&self) -> RevenueForecast {
        revenue_forecast(
            &self.state.projects,
            &self.state.customers,
            &self.config.forecast,
            self.clock.today(),
        )
    }

    pub fn nps(&self) -> NpsReport {
        nps_report(
            &self.state.nps_responses,
            self.state.surveys_sent,
            self.clock.now(),
        )
    }

    pub fn notifications(&self) -> Vec<Notification> {
        generate_notifications(&self.state, self.clock.now(), self.clock.today())
    }

    pub fn group_rollups(&self) -> Vec<GroupRollup> {
        let today = self.clock.today();
        self.state
            .groups
            .iter()
            .map(|g| group_rollup(g, &self.state.projects, today))
            .collect()
    }

    /// Surrender the state, e.g. for snapshotting.
    pub fn into_state(self) -> OpsState {
        self.state
    }
}
