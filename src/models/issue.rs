//! Consistency issue records produced by validation and reconciliation

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::enums::ItemStatus;

/// What kind of drift was detected on an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Stored label disagrees with the counters
    StaleStatus,
    /// Label says checked out but no open checkout line references the item
    OrphanCheckedOut,
    /// Label says pending check-in but no return is pending
    OrphanPendingCheckIn,
    /// Counters outside physical bounds; never auto-corrected
    CounterOutOfBounds,
}

/// One detected inconsistency on one item
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConsistencyIssue {
    pub item_id: i32,
    pub item_name: String,
    pub kind: IssueKind,
    pub stored_status: ItemStatus,
    /// Target status the projection computes; None when the correct value
    /// is ambiguous and requires manual review
    pub expected_status: Option<ItemStatus>,
    /// Human-readable diagnosis for the operator
    pub diagnosis: String,
}

impl ConsistencyIssue {
    /// Whether the reconciler may repair this issue on its own
    pub fn is_correctable(&self) -> bool {
        self.expected_status.is_some()
    }
}

/// Result of a read-only validation pass
#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationReport {
    /// Items whose stored state agrees with the derived state
    pub valid_count: usize,
    pub issues: Vec<ConsistencyIssue>,
}

/// Result of a repair pass
#[derive(Debug, Serialize, ToSchema)]
pub struct ReconcileReport {
    pub fixed_count: usize,
    /// Issues left for manual review or whose repair failed
    pub remaining_issues: Vec<ConsistencyIssue>,
}
