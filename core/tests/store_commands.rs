//! Store dispatch: command application, SLA stamping, invariant
//! enforcement, error paths, and the action log.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use fiberops_core::clock::OpsClock;
use fiberops_core::command::OpsCommand;
use fiberops_core::config::OpsConfig;
use fiberops_core::error::OpsError;
use fiberops_core::event::OpsEvent;
use fiberops_core::model::{Contact, Customer, Project, ProjectGroup, ProjectTask};
use fiberops_core::store::{OpsState, OpsStore};
use fiberops_core::types::{NpsCategory, Priority, ProjectStatus, TicketStatus, VipTier};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
}

fn customer(tier: Option<VipTier>) -> Customer {
    Customer {
        id: "cus-001".into(),
        company: "Brightline Studios".into(),
        contacts: vec![Contact {
            name: "Morgan Hale".into(),
            role: "IT Manager".into(),
            email: "morgan@brightline.example".into(),
            primary: true,
        }],
        vip_tier: tier,
        linkedin_url: None,
    }
}

fn project(id: &str) -> Project {
    Project {
        id: id.into(),
        customer_id: "cus-001".into(),
        name: format!("Install {id}"),
        status: ProjectStatus::New,
        priority: Priority::Normal,
        foc_date: None,
        scheduled_date: None,
        scheduled_slot: None,
        mrc: 650.0,
        nrc: 150.0,
        assignee: None,
        escalated: false,
        escalation_reason: None,
        blockers: vec![],
        tasks: vec![ProjectTask {
            id: "tsk-001".into(),
            label: "Site survey".into(),
            completed: false,
            due: None,
        }],
        readiness: vec![],
        last_contact: None,
        vip_override: None,
        created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
    }
}

fn store(tier: Option<VipTier>) -> OpsStore {
    let state = OpsState {
        customers: vec![customer(tier)],
        projects: vec![project("prj-001")],
        ..OpsState::default()
    };
    OpsStore::new(state, OpsConfig::default(), OpsClock::fixed(date()))
}

#[test]
fn create_rejects_duplicates_and_replace_requires_existing() {
    let mut store = store(None);

    store
        .dispatch(OpsCommand::CreateProject {
            project: project("prj-002"),
        })
        .unwrap();
    assert!(store.project("prj-002").is_some());

    let err = store
        .dispatch(OpsCommand::CreateProject {
            project: project("prj-002"),
        })
        .unwrap_err();
    assert!(matches!(err, OpsError::InvalidCommand(_)));

    // Whole-object replacement.
    let mut edited = project("prj-001");
    edited.mrc = 1200.0;
    store
        .dispatch(OpsCommand::ReplaceProject { project: edited })
        .unwrap();
    assert_eq!(store.project("prj-001").unwrap().mrc, 1200.0);

    let err = store
        .dispatch(OpsCommand::ReplaceProject {
            project: project("prj-999"),
        })
        .unwrap_err();
    assert!(matches!(err, OpsError::NotFound { .. }));
}

#[test]
fn status_contact_and_escalation_round_trip() {
    let mut store = store(None);
    let now = store.clock().now();

    let events = store
        .dispatch(OpsCommand::SetProjectStatus {
            project_id: "prj-001".into(),
            status: ProjectStatus::Scheduled,
        })
        .unwrap();
    assert!(matches!(
        events[0],
        OpsEvent::ProjectStatusChanged {
            from: ProjectStatus::New,
            to: ProjectStatus::Scheduled,
            ..
        }
    ));

    store
        .dispatch(OpsCommand::RecordContact {
            project_id: "prj-001".into(),
            at: now,
        })
        .unwrap();
    assert_eq!(store.project("prj-001").unwrap().last_contact, Some(now));

    store
        .dispatch(OpsCommand::Escalate {
            project_id: "prj-001".into(),
            reason: "Install slipped twice".into(),
        })
        .unwrap();
    assert!(store.project("prj-001").unwrap().escalated);

    store
        .dispatch(OpsCommand::ClearEscalation {
            project_id: "prj-001".into(),
        })
        .unwrap();
    let p = store.project("prj-001").unwrap();
    assert!(!p.escalated);
    assert!(p.escalation_reason.is_none());
}

#[test]
fn blockers_resolve_by_id() {
    let mut store = store(None);

    let events = store
        .dispatch(OpsCommand::AddBlocker {
            project_id: "prj-001".into(),
            reason: "Landlord approval pending".into(),
        })
        .unwrap();
    let blocker_id = match &events[0] {
        OpsEvent::BlockerAdded { blocker_id, .. } => blocker_id.clone(),
        other => panic!("unexpected event: {other:?}"),
    };
    assert_eq!(store.project("prj-001").unwrap().active_blockers(), 1);

    store
        .dispatch(OpsCommand::ResolveBlocker {
            project_id: "prj-001".into(),
            blocker_id,
        })
        .unwrap();
    assert_eq!(store.project("prj-001").unwrap().active_blockers(), 0);

    let err = store
        .dispatch(OpsCommand::ResolveBlocker {
            project_id: "prj-001".into(),
            blocker_id: "blk-missing".into(),
        })
        .unwrap_err();
    assert!(matches!(err, OpsError::NotFound { .. }));
}

#[test]
fn task_completion_toggles() {
    let mut store = store(None);
    store
        .dispatch(OpsCommand::SetTaskCompleted {
            project_id: "prj-001".into(),
            task_id: "tsk-001".into(),
            completed: true,
        })
        .unwrap();
    assert_eq!(store.project("prj-001").unwrap().task_completion(), Some(1.0));
}

/// High priority is 4h/24h; a gold customer tightens both by 0.75.
#[test]
fn sla_clocks_scale_with_vip_tier() {
    let mut store = store(Some(VipTier::Gold));
    let now = store.clock().now();

    let events = store
        .dispatch(OpsCommand::OpenTicket {
            customer_id: "cus-001".into(),
            project_id: Some("prj-001".into()),
            subject: "Static on the line".into(),
            priority: Priority::High,
        })
        .unwrap();
    let ticket_id = match &events[0] {
        OpsEvent::TicketOpened {
            ticket_id,
            response_due,
            resolve_due,
            ..
        } => {
            assert_eq!(*response_due, now + Duration::hours(3));
            assert_eq!(*resolve_due, now + Duration::hours(18));
            ticket_id.clone()
        }
        other => panic!("unexpected event: {other:?}"),
    };

    let ticket = store.ticket(&ticket_id).unwrap();
    assert_eq!(ticket.status, TicketStatus::Open);
    assert_eq!(ticket.resolve_due, now + Duration::hours(18));
}

#[test]
fn project_vip_override_tightens_sla_further() {
    let mut store = store(Some(VipTier::Gold));
    let now = store.clock().now();

    let mut edited = project("prj-001");
    edited.vip_override = Some(VipTier::Platinum);
    store
        .dispatch(OpsCommand::ReplaceProject { project: edited })
        .unwrap();

    let events = store
        .dispatch(OpsCommand::OpenTicket {
            customer_id: "cus-001".into(),
            project_id: Some("prj-001".into()),
            subject: "Full outage".into(),
            priority: Priority::Critical,
        })
        .unwrap();
    match &events[0] {
        OpsEvent::TicketOpened {
            response_due,
            resolve_due,
            ..
        } => {
            // Critical 1h/8h halved by platinum.
            assert_eq!(*response_due, now + Duration::minutes(30));
            assert_eq!(*resolve_due, now + Duration::hours(4));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn ticket_lifecycle_stamps_times_once() {
    let mut store = store(None);
    let now = store.clock().now();

    let events = store
        .dispatch(OpsCommand::OpenTicket {
            customer_id: "cus-001".into(),
            project_id: None,
            subject: "Billing question".into(),
            priority: Priority::Low,
        })
        .unwrap();
    let ticket_id = match &events[0] {
        OpsEvent::TicketOpened { ticket_id, .. } => ticket_id.clone(),
        other => panic!("unexpected event: {other:?}"),
    };

    store
        .dispatch(OpsCommand::RecordFirstResponse {
            ticket_id: ticket_id.clone(),
        })
        .unwrap();
    assert_eq!(store.ticket(&ticket_id).unwrap().first_response_at, Some(now));

    store
        .dispatch(OpsCommand::SetTicketStatus {
            ticket_id: ticket_id.clone(),
            status: TicketStatus::Resolved,
        })
        .unwrap();
    let ticket = store.ticket(&ticket_id).unwrap();
    assert_eq!(ticket.status, TicketStatus::Resolved);
    assert_eq!(ticket.closed_at, Some(now));
}

#[test]
fn open_ticket_requires_a_known_customer() {
    let mut store = store(None);
    let err = store
        .dispatch(OpsCommand::OpenTicket {
            customer_id: "cus-999".into(),
            project_id: None,
            subject: "Who dis".into(),
            priority: Priority::Normal,
        })
        .unwrap_err();
    assert!(matches!(err, OpsError::NotFound { .. }));
}

#[test]
fn nps_category_is_derived_and_score_clamped() {
    let mut store = store(None);

    store
        .dispatch(OpsCommand::RecordNpsResponse {
            customer_id: "cus-001".into(),
            project_id: None,
            score: 14,
            comment: None,
        })
        .unwrap();
    store
        .dispatch(OpsCommand::RecordNpsResponse {
            customer_id: "cus-001".into(),
            project_id: None,
            score: 3,
            comment: Some("Install took three visits".into()),
        })
        .unwrap();

    let responses = &store.state().nps_responses;
    assert_eq!(responses[0].score, 10);
    assert_eq!(responses[0].category, NpsCategory::Promoter);
    assert_eq!(responses[1].category, NpsCategory::Detractor);

    let id = responses[1].id.clone();
    store
        .dispatch(OpsCommand::MarkNpsFollowedUp { response_id: id })
        .unwrap();
    assert!(store.state().nps_responses[1].followed_up);

    store
        .dispatch(OpsCommand::RecordSurveysSent { count: 25 })
        .unwrap();
    store
        .dispatch(OpsCommand::RecordSurveysSent { count: 5 })
        .unwrap();
    assert_eq!(store.state().surveys_sent, 30);
}

#[test]
fn group_membership_is_idempotent() {
    let mut store = store(None);
    store
        .dispatch(OpsCommand::CreateGroup {
            group: ProjectGroup {
                id: "grp-001".into(),
                customer_id: "cus-001".into(),
                name: "Campus rollout".into(),
                project_ids: vec![],
            },
        })
        .unwrap();

    for _ in 0..2 {
        store
            .dispatch(OpsCommand::AddProjectToGroup {
                group_id: "grp-001".into(),
                project_id: "prj-001".into(),
            })
            .unwrap();
    }
    assert_eq!(store.state().groups[0].project_ids, vec!["prj-001"]);

    let err = store
        .dispatch(OpsCommand::AddProjectToGroup {
            group_id: "grp-001".into(),
            project_id: "prj-404".into(),
        })
        .unwrap_err();
    assert!(matches!(err, OpsError::NotFound { .. }));
}

#[test]
fn action_log_records_every_event_in_order() {
    let mut store = store(None);
    store
        .dispatch(OpsCommand::SetProjectStatus {
            project_id: "prj-001".into(),
            status: ProjectStatus::Reviewing,
        })
        .unwrap();
    store
        .dispatch(OpsCommand::AddBlocker {
            project_id: "prj-001".into(),
            reason: "Fiber on backorder".into(),
        })
        .unwrap();

    let log = store.event_log();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].seq, 0);
    assert_eq!(log[1].seq, 1);
    assert_eq!(log[0].event_type, "project_status_changed");
    assert_eq!(log[1].event_type, "blocker_added");
    assert!(log[1].payload.contains("Fiber on backorder"));

    // Failed dispatches leave no trace.
    let _ = store.dispatch(OpsCommand::ClearEscalation {
        project_id: "prj-404".into(),
    });
    assert_eq!(store.event_log().len(), 2);
}
