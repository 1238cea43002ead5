//! Consistency reconciler
//!
//! Detects items whose stored status label disagrees with what the counters
//! and the open request set imply, and repairs the correctable ones. The
//! counters are the trusted side; the label is derived. Counters outside
//! physical bounds are flagged for manual review, never auto-corrected.

use crate::{
    error::AppResult,
    models::{
        issue::{ConsistencyIssue, IssueKind, ReconcileReport, ValidationReport},
        item::{project_status, ItemSnapshot},
        ItemStatus,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ReconcilerService {
    repository: Repository,
}

impl ReconcilerService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Read-only pass: report every drifted item without writing anything
    pub async fn validate(&self) -> AppResult<ValidationReport> {
        let snapshots = self.repository.items.snapshots().await?;

        let mut valid_count = 0;
        let mut issues = Vec::new();
        for snapshot in &snapshots {
            match diagnose(snapshot) {
                Some(issue) => issues.push(issue),
                None => valid_count += 1,
            }
        }

        Ok(ValidationReport { valid_count, issues })
    }

    /// Repair pass: write the projected status for every correctable issue.
    ///
    /// One item's failed repair is logged and kept in the remaining list; it
    /// never aborts the pass. Running twice with no intervening mutation
    /// fixes zero items the second time.
    pub async fn reconcile(&self) -> AppResult<ReconcileReport> {
        let snapshots = self.repository.items.snapshots().await?;

        let mut fixed_count = 0;
        let mut remaining_issues = Vec::new();

        for snapshot in &snapshots {
            let Some(issue) = diagnose(snapshot) else {
                continue;
            };

            let Some(target) = issue.expected_status else {
                tracing::error!(
                    item_id = issue.item_id,
                    diagnosis = %issue.diagnosis,
                    "uncorrectable consistency issue, manual review required"
                );
                remaining_issues.push(issue);
                continue;
            };

            match self.repository.items.set_status(issue.item_id, target).await {
                Ok(()) => {
                    tracing::info!(
                        item_id = issue.item_id,
                        from = %issue.stored_status,
                        to = %target,
                        "repaired drifted status"
                    );
                    fixed_count += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        item_id = issue.item_id,
                        error = %e,
                        "failed to repair item, keeping issue for next pass"
                    );
                    remaining_issues.push(issue);
                }
            }
        }

        tracing::info!(fixed_count, remaining = remaining_issues.len(), "reconcile pass done");
        Ok(ReconcileReport { fixed_count, remaining_issues })
    }
}

/// Diagnose one item snapshot. Returns None when stored and derived state
/// agree, or when the item is in an administrative state the reconciler must
/// not touch.
pub fn diagnose(snapshot: &ItemSnapshot) -> Option<ConsistencyIssue> {
    let stored = snapshot.status();

    if snapshot.quantity_available < 0 || snapshot.quantity_available > snapshot.quantity_total {
        return Some(ConsistencyIssue {
            item_id: snapshot.id,
            item_name: snapshot.name.clone(),
            kind: IssueKind::CounterOutOfBounds,
            stored_status: stored,
            expected_status: None,
            diagnosis: format!(
                "counters out of physical bounds ({} available of {} total); manual review required",
                snapshot.quantity_available, snapshot.quantity_total
            ),
        });
    }

    if stored.is_administrative() {
        return None;
    }

    let expected = project_status(
        snapshot.quantity_available,
        snapshot.quantity_total,
        snapshot.has_pending_checkin,
    );
    if expected == stored {
        return None;
    }

    let (kind, diagnosis) = match stored {
        ItemStatus::CheckedOut if !snapshot.has_outstanding_checkout => (
            IssueKind::OrphanCheckedOut,
            format!(
                "marked checked out but no open checkout references it; counters say {}",
                expected
            ),
        ),
        ItemStatus::PendingCheckIn if !snapshot.has_pending_checkin => (
            IssueKind::OrphanPendingCheckIn,
            format!(
                "marked pending check-in but no return is pending; counters say {}",
                expected
            ),
        ),
        _ => (
            IssueKind::StaleStatus,
            format!(
                "stored status {} disagrees with counters ({} available of {}); should be {}",
                stored, snapshot.quantity_available, snapshot.quantity_total, expected
            ),
        ),
    };

    Some(ConsistencyIssue {
        item_id: snapshot.id,
        item_name: snapshot.name.clone(),
        kind,
        stored_status: stored,
        expected_status: Some(expected),
        diagnosis,
    })
}
