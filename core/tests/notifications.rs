//! Notification generation: per-project and per-ticket triggers plus
//! the severity-first ordering.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use fiberops_core::model::{Blocker, Project, Ticket};
use fiberops_core::notifications::{generate_notifications, NotificationKind, Severity};
use fiberops_core::store::OpsState;
use fiberops_core::types::{Priority, ProjectStatus, TicketStatus};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
}

fn project(id: &str) -> Project {
    Project {
        id: id.into(),
        customer_id: "cus-001".into(),
        name: format!("Install {id}"),
        status: ProjectStatus::Scheduled,
        priority: Priority::Normal,
        foc_date: None,
        scheduled_date: None,
        scheduled_slot: None,
        mrc: 750.0,
        nrc: 0.0,
        assignee: None,
        escalated: false,
        escalation_reason: None,
        blockers: vec![],
        tasks: vec![],
        readiness: vec![],
        last_contact: None,
        vip_override: None,
        created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
    }
}

fn ticket(id: &str, response_due: DateTime<Utc>, resolve_due: DateTime<Utc>) -> Ticket {
    Ticket {
        id: id.into(),
        project_id: None,
        customer_id: "cus-001".into(),
        subject: "Outage at demarc".into(),
        status: TicketStatus::Open,
        priority: Priority::High,
        opened_at: now() - Duration::hours(48),
        first_response_at: None,
        response_due,
        resolve_due,
        closed_at: None,
    }
}

fn state_with(projects: Vec<Project>, tickets: Vec<Ticket>) -> OpsState {
    OpsState {
        projects,
        tickets,
        ..OpsState::default()
    }
}

#[test]
fn foc_triggers_overdue_and_imminent() {
    let mut overdue = project("prj-001");
    overdue.foc_date = Some(today() - Duration::days(3));
    let mut imminent = project("prj-002");
    imminent.foc_date = Some(today() + Duration::days(1));
    let mut comfortable = project("prj-003");
    comfortable.foc_date = Some(today() + Duration::days(5));

    let out = generate_notifications(
        &state_with(vec![overdue, imminent, comfortable], vec![]),
        now(),
        today(),
    );
    assert_eq!(out.len(), 2);
    assert!(out
        .iter()
        .any(|n| n.kind == NotificationKind::FocOverdue && n.severity == Severity::Critical));
    assert!(out
        .iter()
        .any(|n| n.kind == NotificationKind::FocImminent && n.severity == Severity::Warning));
}

#[test]
fn completed_projects_stay_silent() {
    let mut done = project("prj-001");
    done.status = ProjectStatus::Completed;
    done.foc_date = Some(today() - Duration::days(30));
    done.escalated = true;

    let out = generate_notifications(&state_with(vec![done], vec![]), now(), today());
    assert!(out.is_empty());
}

#[test]
fn escalation_blockers_and_stale_contact() {
    let mut p = project("prj-001");
    p.escalated = true;
    p.escalation_reason = Some("CEO called twice".into());
    p.blockers = vec![Blocker {
        id: "blk-001".into(),
        reason: "Trenching permit".into(),
        created_at: now() - Duration::days(4),
        resolved_at: None,
    }];
    p.last_contact = Some(now() - Duration::days(12));

    let out = generate_notifications(&state_with(vec![p], vec![]), now(), today());
    let kinds: Vec<NotificationKind> = out.iter().map(|n| n.kind).collect();
    assert!(kinds.contains(&NotificationKind::Escalation));
    assert!(kinds.contains(&NotificationKind::BlockedProject));
    assert!(kinds.contains(&NotificationKind::StaleContact));
    assert!(out
        .iter()
        .any(|n| n.kind == NotificationKind::Escalation && n.message.contains("CEO called twice")));
}

#[test]
fn install_today_names_the_assignee() {
    let mut p = project("prj-001");
    p.scheduled_date = Some(today());
    p.assignee = Some("Priya Natarajan".into());

    let out = generate_notifications(&state_with(vec![p], vec![]), now(), today());
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].kind, NotificationKind::InstallToday);
    assert_eq!(out[0].severity, Severity::Info);
    assert!(out[0].message.contains("Priya Natarajan"));
}

#[test]
fn sla_breach_outranks_response_overdue() {
    // Past both deadlines: one critical breach, not two notifications.
    let breached = ticket(
        "tck-001",
        now() - Duration::hours(40),
        now() - Duration::hours(10),
    );
    let out = generate_notifications(&state_with(vec![], vec![breached]), now(), today());
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].kind, NotificationKind::SlaBreached);
    assert_eq!(out[0].severity, Severity::Critical);
    assert_eq!(out[0].ticket_id.as_deref(), Some("tck-001"));
}

#[test]
fn response_overdue_clears_once_answered() {
    let mut slow = ticket(
        "tck-001",
        now() - Duration::hours(2),
        now() + Duration::hours(20),
    );
    let out = generate_notifications(&state_with(vec![], vec![slow.clone()]), now(), today());
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].kind, NotificationKind::ResponseOverdue);

    slow.first_response_at = Some(now() - Duration::hours(1));
    let out = generate_notifications(&state_with(vec![], vec![slow]), now(), today());
    assert!(out.is_empty());
}

#[test]
fn closed_tickets_never_alert() {
    let mut done = ticket(
        "tck-001",
        now() - Duration::hours(40),
        now() - Duration::hours(10),
    );
    done.status = TicketStatus::Closed;
    let out = generate_notifications(&state_with(vec![], vec![done]), now(), today());
    assert!(out.is_empty());
}

#[test]
fn output_is_sorted_most_severe_first() {
    let mut escalated = project("prj-001");
    escalated.escalated = true;
    let mut install = project("prj-002");
    install.scheduled_date = Some(today());
    let mut blocked = project("prj-003");
    blocked.blockers = vec![Blocker {
        id: "blk-001".into(),
        reason: "Awaiting MDU approval".into(),
        created_at: now() - Duration::days(1),
        resolved_at: None,
    }];

    let out = generate_notifications(
        &state_with(vec![install, blocked, escalated], vec![]),
        now(),
        today(),
    );
    assert_eq!(out.len(), 3);
    assert_eq!(out[0].severity, Severity::Critical);
    assert_eq!(out[1].severity, Severity::Warning);
    assert_eq!(out[2].severity, Severity::Info);
    let sorted: Vec<Severity> = out.iter().map(|n| n.severity).collect();
    let mut resorted = sorted.clone();
    resorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(sorted, resorted);
}
