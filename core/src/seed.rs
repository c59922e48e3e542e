//! Deterministic seed data — the mock dataset the dashboard ships with.
//!
//! Same seed + same date ⇒ byte-identical state. Entity ids are
//! sequential (`cus-001`, `prj-007`, …) so tests can reference them.

use crate::config::{OpsConfig, SlaConfig};
use crate::model::{
    Blocker, Contact, Customer, NewsAlert, NpsResponse, Project, ProjectGroup, ProjectTask,
    ReadinessTask, Ticket,
};
use crate::rng::SeedRng;
use crate::store::OpsState;
use crate::types::{
    InstallSlot, NpsCategory, Priority, ProjectStatus, TicketStatus, VipTier,
};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

const COMPANIES: &[&str] = &[
    "Harbor Point Dental",
    "Cedar & Main Coffee",
    "Northgate Logistics",
    "Bluefin Analytics",
    "Ridgeline Property Group",
    "Marigold Senior Living",
    "Vantage Auto Group",
    "Stonebridge Law",
    "Peak Physical Therapy",
    "Lanternworks Studio",
    "Crescent Bay Hotels",
    "Ironwood Manufacturing",
];

const FIRST_NAMES: &[&str] = &[
    "Maria", "James", "Aisha", "Tom", "Elena", "Derek", "Priya", "Sam", "Rosa", "Kenji",
    "Nadia", "Paul", "Grace", "Omar", "Lily", "Victor",
];

const LAST_NAMES: &[&str] = &[
    "Garcia", "Okafor", "Lindqvist", "Patel", "Romano", "Chen", "Dubois", "Novak", "Reyes",
    "Tanaka", "Iversen", "Whitman",
];

const ROLES: &[&str] = &["Owner", "Office Manager", "IT Lead", "Operations", "Facilities"];

const BLOCKER_REASONS: &[&str] = &[
    "Awaiting permit from city",
    "Fiber drop not yet trenched",
    "Customer MDF room inaccessible",
    "Equipment backordered",
    "Easement signature outstanding",
];

const TASK_LABELS: &[&str] = &[
    "Site survey",
    "Confirm service address",
    "Order CPE",
    "Schedule splice crew",
    "Verify static IP block",
    "Walkthrough with customer",
];

const READINESS_LABELS: &[&str] = &[
    "Power at demarc",
    "Conduit clear",
    "Rack space confirmed",
    "Signed work order",
];

const TICKET_SUBJECTS: &[&str] = &[
    "Slow speeds after install",
    "Billing question on NRC",
    "Reschedule install window",
    "ONT offline",
    "Static IP not routing",
    "Construction timeline inquiry",
];

const HEADLINES: &[&str] = &[
    "announces second location",
    "featured in local business journal",
    "hiring surge reported",
    "acquired by regional competitor",
    "wins chamber of commerce award",
];

const STATUSES: &[ProjectStatus] = &[
    ProjectStatus::New,
    ProjectStatus::New,
    ProjectStatus::Reviewing,
    ProjectStatus::Reviewing,
    ProjectStatus::Scheduled,
    ProjectStatus::Scheduled,
    ProjectStatus::Confirmed,
    ProjectStatus::Installing,
    ProjectStatus::Completed,
    ProjectStatus::Completed,
];

/// Build the full mock dataset as of `today`.
pub fn seed_state(seed: u64, today: NaiveDate, config: &OpsConfig) -> OpsState {
    let mut rng = SeedRng::new(seed);
    let mut state = OpsState::default();

    for (i, company) in COMPANIES.iter().enumerate() {
        let mut contacts = Vec::new();
        let n_contacts = rng.range_i64(1, 3);
        for c in 0..n_contacts {
            let first = rng.pick(FIRST_NAMES);
            let last = rng.pick(LAST_NAMES);
            contacts.push(Contact {
                name: format!("{first} {last}"),
                role: rng.pick(ROLES).to_string(),
                email: format!(
                    "{}.{}@example.com",
                    first.to_lowercase(),
                    last.to_lowercase()
                ),
                primary: c == 0,
            });
        }
        let vip_tier = if rng.chance(0.15) {
            Some(VipTier::Platinum)
        } else if rng.chance(0.2) {
            Some(VipTier::Gold)
        } else if rng.chance(0.25) {
            Some(VipTier::Silver)
        } else {
            None
        };
        state.customers.push(Customer {
            id: format!("cus-{:03}", i + 1),
            company: company.to_string(),
            contacts,
            vip_tier,
            linkedin_url: rng
                .chance(0.5)
                .then(|| format!("https://linkedin.com/company/{}", slug(company))),
        });
    }

    for i in 0..28usize {
        let customer_idx = rng.next_u64_below(COMPANIES.len() as u64) as usize;
        let customer_id = format!("cus-{:03}", customer_idx + 1);
        let status = *rng.pick(STATUSES);
        let project = build_project(&mut rng, i, customer_id, status, today, config);
        state.projects.push(project);
    }

    seed_tickets(&mut rng, &mut state, today, config);
    seed_nps(&mut rng, &mut state, today);
    seed_news(&mut rng, &mut state, today);

    // One rollup group: everything for the first customer.
    let flagship: Vec<String> = state
        .projects
        .iter()
        .filter(|p| p.customer_id == "cus-001")
        .map(|p| p.id.clone())
        .collect();
    state.groups.push(ProjectGroup {
        id: "grp-001".to_string(),
        customer_id: "cus-001".to_string(),
        name: format!("{} rollout", COMPANIES[0]),
        project_ids: flagship,
    });

    state.surveys_sent = 60;
    state
}

fn build_project(
    rng: &mut SeedRng,
    i: usize,
    customer_id: String,
    status: ProjectStatus,
    today: NaiveDate,
    config: &OpsConfig,
) -> Project {
    let completed = status == ProjectStatus::Completed;

    // FOC between 10 days past and 45 days out; completed jobs sit
    // safely in the past.
    let foc_offset = if completed {
        rng.range_i64(-60, -10)
    } else {
        rng.range_i64(-10, 45)
    };
    let foc_date = Some(today + Duration::days(foc_offset));

    let scheduled_date = match status {
        ProjectStatus::Scheduled | ProjectStatus::Confirmed | ProjectStatus::Installing => {
            Some(today + Duration::days(rng.range_i64(0, 13)))
        }
        ProjectStatus::Completed => Some(today + Duration::days(rng.range_i64(-30, -5))),
        _ => None,
    };

    let mut tasks = Vec::new();
    let n_tasks = rng.range_i64(3, 6);
    for t in 0..n_tasks {
        tasks.push(ProjectTask {
            id: format!("tsk-{:03}-{t}", i + 1),
            label: rng.pick(TASK_LABELS).to_string(),
            completed: completed || rng.chance(0.55),
            due: rng
                .chance(0.4)
                .then(|| today + Duration::days(rng.range_i64(-3, 14))),
        });
    }

    let mut readiness = Vec::new();
    let n_ready = rng.range_i64(2, 4);
    for r in 0..n_ready {
        readiness.push(ReadinessTask {
            id: format!("rdy-{:03}-{r}", i + 1),
            label: rng.pick(READINESS_LABELS).to_string(),
            completed: completed || rng.chance(0.6),
            critical: rng.chance(0.4),
        });
    }

    let mut blockers = Vec::new();
    if !completed && rng.chance(0.3) {
        let n = rng.range_i64(1, 2);
        for b in 0..n {
            let created = at(today - Duration::days(rng.range_i64(2, 12)));
            blockers.push(Blocker {
                id: format!("blk-{:03}-{b}", i + 1),
                reason: rng.pick(BLOCKER_REASONS).to_string(),
                created_at: created,
                resolved_at: rng.chance(0.3).then(|| created + Duration::days(1)),
            });
        }
    }

    let escalated = !completed && rng.chance(0.15);

    Project {
        id: format!("prj-{:03}", i + 1),
        customer_id,
        name: format!("Fiber install #{:03}", i + 1),
        status,
        priority: *rng.pick(&[
            Priority::Low,
            Priority::Normal,
            Priority::Normal,
            Priority::High,
            Priority::Critical,
        ]),
        foc_date,
        scheduled_date,
        scheduled_slot: scheduled_date.map(|_| {
            *rng.pick(&[
                InstallSlot::Morning,
                InstallSlot::Afternoon,
                InstallSlot::Evening,
            ])
        }),
        mrc: *rng.pick(&[149.0, 249.0, 399.0, 599.0, 899.0, 1200.0]),
        nrc: *rng.pick(&[0.0, 99.0, 250.0, 500.0]),
        assignee: Some(rng.pick(&config.capacity.roster).clone()),
        escalated,
        escalation_reason: escalated.then(|| "Customer threatening cancellation".to_string()),
        blockers,
        tasks,
        readiness,
        last_contact: rng
            .chance(0.85)
            .then(|| at(today - Duration::days(rng.range_i64(0, 20)))),
        vip_override: rng.chance(0.1).then_some(VipTier::Gold),
        created_at: at(today - Duration::days(rng.range_i64(20, 90))),
    }
}

fn seed_tickets(rng: &mut SeedRng, state: &mut OpsState, today: NaiveDate, config: &OpsConfig) {
    for i in 0..10usize {
        let customer_idx = rng.next_u64_below(state.customers.len() as u64) as usize;
        let customer = &state.customers[customer_idx];
        let customer_id = customer.id.clone();
        let tier = customer.vip_tier.unwrap_or(VipTier::Standard);
        let project_id = state
            .projects
            .iter()
            .find(|p| p.customer_id == customer_id)
            .map(|p| p.id.clone());

        let priority = *rng.pick(&[
            Priority::Low,
            Priority::Normal,
            Priority::Normal,
            Priority::High,
            Priority::Critical,
        ]);
        let opened_at = at(today - Duration::days(rng.range_i64(0, 6)));
        let target = config.sla.target(priority);
        let mult = SlaConfig::tier_multiplier(tier);
        let status = *rng.pick(&[
            TicketStatus::Open,
            TicketStatus::Open,
            TicketStatus::Pending,
            TicketStatus::Resolved,
            TicketStatus::Closed,
        ]);

        state.tickets.push(Ticket {
            id: format!("tck-{:03}", i + 1),
            project_id,
            customer_id,
            subject: rng.pick(TICKET_SUBJECTS).to_string(),
            status,
            priority,
            opened_at,
            first_response_at: rng
                .chance(0.7)
                .then(|| opened_at + Duration::hours(rng.range_i64(1, 8))),
            response_due: opened_at
                + Duration::minutes((target.response_hours as f64 * mult * 60.0) as i64),
            resolve_due: opened_at
                + Duration::minutes((target.resolve_hours as f64 * mult * 60.0) as i64),
            closed_at: (!status.is_open())
                .then(|| opened_at + Duration::hours(rng.range_i64(8, 72))),
        });
    }
}

fn seed_nps(rng: &mut SeedRng, state: &mut OpsState, today: NaiveDate) {
    for i in 0..40usize {
        let customer_idx = rng.next_u64_below(state.customers.len() as u64) as usize;
        let customer_id = state.customers[customer_idx].id.clone();
        // Weighted toward the happy end, with a real detractor tail.
        let score = *rng.pick(&[10, 10, 9, 9, 9, 8, 8, 7, 6, 5, 3]) as u8;
        let responded_at = at(today - Duration::days(rng.range_i64(0, 150)));
        state.nps_responses.push(NpsResponse {
            id: format!("nps-{:03}", i + 1),
            customer_id,
            project_id: None,
            score,
            category: NpsCategory::from_score(score),
            responded_at,
            followed_up: rng.chance(0.5),
            comment: None,
        });
    }
}

fn seed_news(rng: &mut SeedRng, state: &mut OpsState, today: NaiveDate) {
    for i in 0..8usize {
        let customer_idx = rng.next_u64_below(state.customers.len() as u64) as usize;
        let customer = &state.customers[customer_idx];
        state.news_alerts.push(NewsAlert {
            id: format!("nws-{:03}", i + 1),
            customer_id: customer.id.clone(),
            headline: format!("{} {}", customer.company, rng.pick(HEADLINES)),
            published_at: at(today - Duration::days(rng.range_i64(0, 30))),
            read: rng.chance(0.5),
        });
    }
}

fn at(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(10, 0, 0).unwrap_or_default())
}

fn slug(name: &str) -> String {
    name.chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() {
                Some(c.to_ascii_lowercase())
            } else if c == ' ' {
                Some('-')
            } else {
                None
            }
        })
        .collect()
}
