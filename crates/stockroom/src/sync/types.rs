//! Request and result types for sync orchestration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::prelude::SyncStatus;
use crate::id::{IntegrationId, UserId};

/// A request to synchronize one (user, shop) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncRequest {
    pub user_id: UserId,
    pub shop_domain: String,
    #[serde(default)]
    pub force: bool,
}

/// Status reported back to the caller.
///
/// Extends the stored lifecycle states with the two read-only answers a
/// status query can produce for integrations that have no `full_sync` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatusReport {
    Pending,
    InProgress,
    Completed,
    Failed,
    NeverSynced,
    PartialSyncOnly,
}

impl From<SyncStatus> for SyncStatusReport {
    fn from(status: SyncStatus) -> Self {
        match status {
            SyncStatus::Pending => SyncStatusReport::Pending,
            SyncStatus::InProgress => SyncStatusReport::InProgress,
            SyncStatus::Completed => SyncStatusReport::Completed,
            SyncStatus::Failed => SyncStatusReport::Failed,
        }
    }
}

impl std::fmt::Display for SyncStatusReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SyncStatusReport::Pending => "pending",
            SyncStatusReport::InProgress => "in_progress",
            SyncStatusReport::Completed => "completed",
            SyncStatusReport::Failed => "failed",
            SyncStatusReport::NeverSynced => "never_synced",
            SyncStatusReport::PartialSyncOnly => "partial_sync_only",
        };
        f.write_str(s)
    }
}

/// Outcome of a trigger or status call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncOutcome {
    /// Absent only when no integration exists yet.
    pub integration_id: Option<IntegrationId>,
    pub status: SyncStatusReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_synced: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Row counts written by one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStats {
    pub locations: u64,
    pub products: u64,
    pub product_variants: u64,
    pub inventory_items: u64,
    pub inventory_levels: u64,
    pub orders: u64,
    pub order_line_items: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&SyncStatusReport::NeverSynced).unwrap(),
            "\"never_synced\""
        );
        assert_eq!(SyncStatusReport::PartialSyncOnly.to_string(), "partial_sync_only");
    }

    #[test]
    fn report_mirrors_stored_status() {
        assert_eq!(
            SyncStatusReport::from(SyncStatus::InProgress),
            SyncStatusReport::InProgress
        );
        assert_eq!(
            SyncStatusReport::from(SyncStatus::Completed),
            SyncStatusReport::Completed
        );
    }
}
