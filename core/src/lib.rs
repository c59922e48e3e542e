//! fiberops-core — operations core for a fiber-install business.
//!
//! The store holds one in-memory state document behind a single-writer
//! command API; every report module is a pure function over a snapshot
//! of that state. Persistence is a single versioned JSON blob.

pub mod capacity;
pub mod churn;
pub mod clock;
pub mod command;
pub mod config;
pub mod customer_health;
pub mod error;
pub mod event;
pub mod groups;
pub mod health;
pub mod model;
pub mod notifications;
pub mod nps;
pub mod revenue;
pub mod rng;
pub mod seed;
pub mod snapshot;
pub mod store;
pub mod types;
