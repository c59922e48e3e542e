//! Shared primitive types and closed enums used across the whole crate.
//!
//! RULE: status/priority/tier values are closed sum types, never free
//! strings. Adding a variant is an explicit, reviewed change.

use serde::{Deserialize, Serialize};

/// A stable, unique identifier for any entity.
pub type EntityId = String;

/// Pipeline position of an install project.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    New,
    Reviewing,
    Scheduled,
    Confirmed,
    Installing,
    Completed,
}

impl ProjectStatus {
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Completed)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Reviewing => "reviewing",
            Self::Scheduled => "scheduled",
            Self::Confirmed => "confirmed",
            Self::Installing => "installing",
            Self::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Normal,
    High,
    Critical,
}

/// Service-level tier. Project-level override beats the customer tier;
/// `effective_vip_tier` in model.rs resolves the chain.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum VipTier {
    Standard,
    Silver,
    Gold,
    Platinum,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    Pending,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open | Self::Pending)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InstallSlot {
    Morning,
    Afternoon,
    Evening,
}

/// NPS bucket. INVARIANT: a stored response's category always equals
/// `NpsCategory::from_score(score)` — the store re-derives it on write.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NpsCategory {
    Promoter,
    Passive,
    Detractor,
}

impl NpsCategory {
    /// 9–10 promoter, 7–8 passive, 0–6 detractor.
    pub fn from_score(score: u8) -> Self {
        match score {
            9..=10 => Self::Promoter,
            7..=8 => Self::Passive,
            _ => Self::Detractor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nps_category_boundaries() {
        assert_eq!(NpsCategory::from_score(10), NpsCategory::Promoter);
        assert_eq!(NpsCategory::from_score(9), NpsCategory::Promoter);
        assert_eq!(NpsCategory::from_score(8), NpsCategory::Passive);
        assert_eq!(NpsCategory::from_score(7), NpsCategory::Passive);
        assert_eq!(NpsCategory::from_score(6), NpsCategory::Detractor);
        assert_eq!(NpsCategory::from_score(0), NpsCategory::Detractor);
    }

    #[test]
    fn completed_is_not_active() {
        assert!(!ProjectStatus::Completed.is_active());
        assert!(ProjectStatus::Installing.is_active());
    }
}
