//! Project health scorer: ranges, level boundaries, the completed
//! short-circuit, and the factor arithmetic.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use fiberops_core::health::{project_health, HealthLevel};
use fiberops_core::model::{Blocker, Project, ProjectTask, ReadinessTask};
use fiberops_core::types::{Priority, ProjectStatus};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
}

fn project(status: ProjectStatus) -> Project {
    Project {
        id: "prj-001".into(),
        customer_id: "cus-001".into(),
        name: "Fiber install #001".into(),
        status,
        priority: Priority::Normal,
        foc_date: None,
        scheduled_date: None,
        scheduled_slot: None,
        mrc: 599.0,
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

fn blocker(id: &str, resolved: bool) -> Blocker {
    let created = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
    Blocker {
        id: id.into(),
        reason: "Awaiting permit".into(),
        created_at: created,
        resolved_at: resolved.then(|| created + Duration::days(1)),
    }
}

fn task(id: &str, completed: bool) -> ProjectTask {
    ProjectTask {
        id: id.into(),
        label: "Site survey".into(),
        completed,
        due: None,
    }
}

#[test]
fn clean_project_scores_perfect() {
    let health = project_health(&project(ProjectStatus::New), today());
    assert_eq!(health.score, 100);
    assert_eq!(health.level, HealthLevel::Healthy);
    assert!(health.factors.is_empty());
}

#[test]
fn level_boundaries_are_exact() {
    assert_eq!(HealthLevel::from_score(100), HealthLevel::Healthy);
    assert_eq!(HealthLevel::from_score(80), HealthLevel::Healthy);
    assert_eq!(HealthLevel::from_score(79), HealthLevel::NeedsAttention);
    assert_eq!(HealthLevel::from_score(60), HealthLevel::NeedsAttention);
    assert_eq!(HealthLevel::from_score(59), HealthLevel::AtRisk);
    assert_eq!(HealthLevel::from_score(40), HealthLevel::AtRisk);
    assert_eq!(HealthLevel::from_score(39), HealthLevel::Critical);
    assert_eq!(HealthLevel::from_score(0), HealthLevel::Critical);
}

/// Completed projects score 100 with exactly one factor, no matter how
/// bad the rest of the record looks.
#[test]
fn completed_short_circuits_everything() {
    let mut p = project(ProjectStatus::Completed);
    p.escalated = true;
    p.foc_date = Some(today() - Duration::days(30));
    p.blockers = vec![blocker("b1", false), blocker("b2", false)];
    p.tasks = vec![task("t1", false)];

    let health = project_health(&p, today());
    assert_eq!(health.score, 100);
    assert_eq!(health.level, HealthLevel::Healthy);
    assert_eq!(health.factors.len(), 1);
}

/// FOC yesterday + 2 unresolved blockers + 0% tasks + 20-day contact
/// gap: −5 −20 −15 −25 ⇒ 35, critical.
#[test]
fn overdue_blocked_stale_project_is_critical() {
    let mut p = project(ProjectStatus::Reviewing);
    p.foc_date = Some(today() - Duration::days(1));
    p.blockers = vec![blocker("b1", false), blocker("b2", false)];
    p.tasks = vec![
        task("t1", false),
        task("t2", false),
        task("t3", false),
        task("t4", false),
    ];
    p.last_contact = Some(
        Utc.from_utc_datetime(
            &(today() - Duration::days(20)).and_hms_opt(10, 0, 0).unwrap(),
        ),
    );

    let health = project_health(&p, today());
    let deltas: Vec<i64> = health.factors.iter().map(|f| f.delta).collect();
    assert!(deltas.contains(&-5), "FOC one day past should cost 5: {deltas:?}");
    assert!(deltas.contains(&-20), "two blockers cap at 20: {deltas:?}");
    assert!(deltas.contains(&-15), "0% tasks costs 15: {deltas:?}");
    assert!(deltas.contains(&-25), "20-day gap caps at 25: {deltas:?}");
    assert_eq!(health.score, 35);
    assert_eq!(health.level, HealthLevel::Critical);
}

#[test]
fn foc_overdue_deduction_caps_at_30() {
    let mut p = project(ProjectStatus::Scheduled);
    p.foc_date = Some(today() - Duration::days(45));
    let health = project_health(&p, today());
    assert_eq!(health.factors[0].delta, -30);
}

#[test]
fn foc_proximity_tiers() {
    let mut p = project(ProjectStatus::Scheduled);

    p.foc_date = Some(today() + Duration::days(2));
    assert_eq!(project_health(&p, today()).factors[0].delta, -15);

    p.foc_date = Some(today() + Duration::days(4));
    assert_eq!(project_health(&p, today()).factors[0].delta, -5);

    p.foc_date = Some(today() + Duration::days(6));
    assert!(project_health(&p, today()).factors.is_empty());
}

#[test]
fn blocker_deduction_caps_at_20() {
    let mut p = project(ProjectStatus::New);
    p.blockers = (0..5).map(|i| blocker(&format!("b{i}"), false)).collect();
    let health = project_health(&p, today());
    assert_eq!(health.factors[0].delta, -20);

    // Resolved blockers do not count.
    let mut p = project(ProjectStatus::New);
    p.blockers = vec![blocker("b1", true)];
    assert!(project_health(&p, today()).factors.is_empty());
}

#[test]
fn task_completion_tiers() {
    let mut p = project(ProjectStatus::New);
    p.tasks = vec![task("t1", true), task("t2", true), task("t3", false), task("t4", false)];
    // 50% complete sits in the <75% tier.
    assert_eq!(project_health(&p, today()).factors[0].delta, -5);

    p.tasks = vec![task("t1", true), task("t2", false), task("t3", false), task("t4", false)];
    // 25% complete sits in the <50% tier.
    assert_eq!(project_health(&p, today()).factors[0].delta, -10);
}

#[test]
fn critical_readiness_tiers() {
    let ready = |id: &str, completed: bool, critical: bool| ReadinessTask {
        id: id.into(),
        label: "Power at demarc".into(),
        completed,
        critical,
    };

    let mut p = project(ProjectStatus::New);
    p.readiness = vec![ready("r1", true, true), ready("r2", false, true)];
    assert_eq!(project_health(&p, today()).factors[0].delta, -8);

    p.readiness = vec![ready("r1", false, true), ready("r2", false, true)];
    assert_eq!(project_health(&p, today()).factors[0].delta, -15);

    // Non-critical readiness tasks never deduct.
    p.readiness = vec![ready("r1", false, false)];
    assert!(project_health(&p, today()).factors.is_empty());
}

#[test]
fn confirmed_bonus_clamps_at_100() {
    let p = project(ProjectStatus::Confirmed);
    let health = project_health(&p, today());
    assert_eq!(health.score, 100, "bonus alone must not exceed the clamp");
    assert_eq!(health.factors.len(), 1);
    assert_eq!(health.factors[0].delta, 5);
}

#[test]
fn escalation_costs_ten() {
    let mut p = project(ProjectStatus::New);
    p.escalated = true;
    p.escalation_reason = Some("Customer threatening cancellation".into());
    let health = project_health(&p, today());
    assert_eq!(health.score, 90);
    assert!(health.factors[0].description.contains("Escalated"));
}
