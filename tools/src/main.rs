//! ops-runner: headless report runner for the fiberops core.
//!
//! Usage:
//!   ops-runner --seed 42 --state ops_state.json
//!   ops-runner --seed 42 --date 2026-08-29
//!
//! Loads the snapshot if one exists (reseeding on version mismatch or
//! corruption), applies a small demo command stream, prints every
//! report, and saves the snapshot back.

use anyhow::Result;
use chrono::NaiveDate;
use fiberops_core::{
    clock::OpsClock,
    command::OpsCommand,
    config::OpsConfig,
    seed::seed_state,
    snapshot,
    store::OpsStore,
    types::Priority,
};
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let state_path = args
        .windows(2)
        .find(|w| w[0] == "--state")
        .map(|w| w[1].clone())
        .unwrap_or_else(|| "ops_state.json".to_string());
    let clock = match args.windows(2).find(|w| w[0] == "--date") {
        Some(w) => {
            let date: NaiveDate = w[1].parse()?;
            OpsClock::fixed(date)
        }
        None => OpsClock::system(),
    };

    println!("fiberops — ops-runner");
    println!("  seed:  {seed}");
    println!("  state: {state_path}");
    println!("  today: {}", clock.today());
    println!();

    let config = OpsConfig::default();
    let path = Path::new(&state_path);
    let state = match snapshot::load(path)? {
        Some(state) => {
            log::info!("loaded snapshot from {state_path}");
            state
        }
        None => {
            log::info!("no usable snapshot; seeding fresh state");
            seed_state(seed, clock.today(), &config)
        }
    };

    let mut store = OpsStore::new(state, config, clock);
    run_demo_commands(&mut store)?;
    print_summary(&store);

    let now = store.clock().now();
    snapshot::save(path, store.state(), now)?;
    println!("\nSnapshot written to {state_path}");
    Ok(())
}

/// A small slice of dashboard activity, to exercise the dispatch path.
fn run_demo_commands(store: &mut OpsStore) -> Result<()> {
    let first_project = store.state().projects.first().map(|p| p.id.clone());
    if let Some(project_id) = first_project {
        let customer_id = store
            .project(&project_id)
            .map(|p| p.customer_id.clone())
            .unwrap_or_default();
        store.dispatch(OpsCommand::RecordContact {
            project_id: project_id.clone(),
            at: store.clock().now(),
        })?;
        store.dispatch(OpsCommand::OpenTicket {
            customer_id,
            project_id: Some(project_id),
            subject: "Confirm install window".to_string(),
            priority: Priority::Normal,
        })?;
    }
    Ok(())
}

fn print_summary(store: &OpsStore) {
    let state = store.state();
    println!("── Pipeline ────────────────────────────────────────");
    println!("  customers: {}", state.customers.len());
    println!("  projects:  {}", state.projects.len());
    println!("  tickets:   {}", state.tickets.len());

    println!("\n── Project health ──────────────────────────────────");
    let mut health = store.all_project_health();
    health.sort_by_key(|h| h.score);
    for h in health.iter().take(5) {
        println!("  {:<10} {:>3}  {:?}", h.project_id, h.score, h.level);
        for factor in &h.factors {
            println!("      {:>4}  {}", factor.delta, factor.description);
        }
    }

    println!("\n── Churn risk ──────────────────────────────────────");
    for customer in &state.customers {
        if let Ok(assessment) = store.churn_risk_for(&customer.id) {
            if assessment.score > 0 {
                println!(
                    "  {:<28} {:>3}  {:?}",
                    customer.company, assessment.score, assessment.level
                );
            }
        }
    }

    let capacity = store.capacity();
    println!("\n── Capacity ────────────────────────────────────────");
    println!(
        "  active: {}  scheduled(14d): {}  free slots: {}",
        capacity.summary.total_active_projects,
        capacity.summary.scheduled_in_horizon,
        capacity.summary.available_slots
    );
    for member in &capacity.members {
        println!(
            "  {:<18} active={:<2} util={:>4.0}%  {:?}",
            member.name,
            member.active_projects,
            member.utilization * 100.0,
            member.status
        );
    }
    for rec in &capacity.recommendations {
        println!("  • {rec}");
    }

    let revenue = store.revenue();
    println!("\n── Revenue ─────────────────────────────────────────");
    println!(
        "  sold: ${:.0}  activated: ${:.0} ({}%)  at-risk: ${:.0}",
        revenue.total_sold_mrc,
        revenue.activated_mrc,
        revenue.activation_rate,
        revenue.at_risk_mrc
    );
    for month in &revenue.months {
        println!(
            "  {:<9} +${:<8.0} cumulative ${:.0}",
            month.label, month.forecast_mrc, month.cumulative_mrc
        );
    }

    let nps = store.nps();
    println!("\n── NPS ─────────────────────────────────────────────");
    println!(
        "  score: {}  ({} responses, {:?})",
        nps.score, nps.responses, nps.trend
    );
    for insight in &nps.insights {
        println!("  • {insight}");
    }

    let notifications = store.notifications();
    println!("\n── Notifications ({}) ──────────────────────────────", notifications.len());
    for n in notifications.iter().take(10) {
        println!("  [{:?}] {}", n.severity, n.message);
    }

    for rollup in store.group_rollups() {
        println!(
            "\n── Group '{}': {} project(s), ${:.0} MRC, avg health {:.0}",
            rollup.name, rollup.project_count, rollup.total_mrc, rollup.avg_health_score
        );
    }
}

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
