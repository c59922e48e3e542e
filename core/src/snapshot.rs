//! Snapshot persistence — the whole state as one versioned JSON blob.
//!
//! Load semantics match the dashboard's storage contract: a missing
//! file, a parse failure, or a version mismatch all yield `None` so the
//! caller silently reseeds. Only genuine I/O failures surface as
//! errors.

use crate::error::OpsResult;
use crate::store::OpsState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Bump whenever `OpsState`'s shape changes incompatibly.
pub const SNAPSHOT_VERSION: &str = "3";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpsSnapshot {
    pub version: String,
    pub saved_at: DateTime<Utc>,
    pub state: OpsState,
}

pub fn save(path: &Path, state: &OpsState, now: DateTime<Utc>) -> OpsResult<()> {
    let snapshot = OpsSnapshot {
        version: SNAPSHOT_VERSION.to_string(),
        saved_at: now,
        state: state.clone(),
    };
    let json = serde_json::to_string_pretty(&snapshot)?;
    fs::write(path, json)?;
    log::debug!("snapshot saved to {}", path.display());
    Ok(())
}

/// Load a snapshot if one exists, parses, and matches the current
/// version. Corrupt or stale blobs are discarded with a warning.
pub fn load(path: &Path) -> OpsResult<Option<OpsState>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let snapshot: OpsSnapshot = match serde_json::from_str(&raw) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("discarding unreadable snapshot {}: {e}", path.display());
            return Ok(None);
        }
    };

    if snapshot.version != SNAPSHOT_VERSION {
        log::warn!(
            "discarding snapshot {} with version '{}' (current '{}')",
            path.display(),
            snapshot.version,
            SNAPSHOT_VERSION
        );
        return Ok(None);
    }

    Ok(Some(snapshot.state))
}
