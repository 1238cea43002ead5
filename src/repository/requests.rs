//! Checkout requests repository
//!
//! Approval and return confirmation touch the item counters, so those run as
//! single transactions over all lines: one insufficient line rolls the whole
//! operation back. Partial approval is the failure mode the reconciler exists
//! to heal, not something this module is allowed to produce.

use chrono::Utc;
use sqlx::{Pool, Postgres, Row, Transaction};

use super::items::has_pending_checkin;
use crate::{
    error::{AppError, AppResult},
    models::{
        item::{project_status, ReturnOutcome},
        request::{CheckoutRequest, CreateRequest, RequestDetails, RequestLine, ReturnReport},
        ItemStatus, RequestStatus,
    },
};

#[derive(Clone)]
pub struct RequestsRepository {
    pool: Pool<Postgres>,
}

impl RequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get request by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<CheckoutRequest> {
        sqlx::query_as::<_, CheckoutRequest>("SELECT * FROM checkout_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Checkout request {} not found", id)))
    }

    /// Get request with its lines
    pub async fn get_details(&self, id: i32) -> AppResult<RequestDetails> {
        let request = self.get_by_id(id).await?;
        let lines = sqlx::query_as::<_, RequestLine>(
            "SELECT * FROM request_lines WHERE request_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(RequestDetails { request, lines })
    }

    /// List requests, optionally filtered by status
    pub async fn list(&self, status: Option<RequestStatus>) -> AppResult<Vec<CheckoutRequest>> {
        let rows = match status {
            Some(s) => {
                sqlx::query_as::<_, CheckoutRequest>(
                    "SELECT * FROM checkout_requests WHERE status = $1 ORDER BY crea_date DESC",
                )
                .bind(i16::from(s))
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, CheckoutRequest>(
                    "SELECT * FROM checkout_requests ORDER BY crea_date DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    /// List requests filed by one user
    pub async fn list_for_user(&self, requester_id: i32) -> AppResult<Vec<CheckoutRequest>> {
        let rows = sqlx::query_as::<_, CheckoutRequest>(
            "SELECT * FROM checkout_requests WHERE requester_id = $1 ORDER BY crea_date DESC",
        )
        .bind(requester_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Create a request with its lines
    pub async fn create(&self, requester_id: i32, data: &CreateRequest) -> AppResult<RequestDetails> {
        let mut tx = self.pool.begin().await?;

        let request = sqlx::query_as::<_, CheckoutRequest>(
            r#"
            INSERT INTO checkout_requests (requester_id, status, notes)
            VALUES ($1, 0, $2)
            RETURNING *
            "#,
        )
        .bind(requester_id)
        .bind(&data.notes)
        .fetch_one(&mut *tx)
        .await?;

        let mut lines = Vec::with_capacity(data.lines.len());
        for line in &data.lines {
            // Reject lines against unknown items up front
            let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM items WHERE id = $1)")
                .bind(line.item_id)
                .fetch_one(&mut *tx)
                .await?;
            if !exists {
                return Err(AppError::NotFound(format!("Item {} not found", line.item_id)));
            }

            let row = sqlx::query_as::<_, RequestLine>(
                r#"
                INSERT INTO request_lines (request_id, item_id, quantity)
                VALUES ($1, $2, $3)
                RETURNING *
                "#,
            )
            .bind(request.id)
            .bind(line.item_id)
            .bind(line.quantity)
            .fetch_one(&mut *tx)
            .await?;
            lines.push(row);
        }

        tx.commit().await?;
        Ok(RequestDetails { request, lines })
    }

    /// Approve a pending request: decrement every line in one transaction.
    ///
    /// Each line uses the same compare-and-decrement as the single-item
    /// ledger path; the first line that cannot be satisfied aborts the whole
    /// approval.
    pub async fn approve(&self, id: i32) -> AppResult<RequestDetails> {
        let mut tx = self.pool.begin().await?;

        let request = lock_request(&mut tx, id).await?;
        if request.status() != RequestStatus::Pending {
            return Err(AppError::Lifecycle(format!(
                "Request {} is {}, only pending requests can be approved",
                id,
                request.status()
            )));
        }

        let lines = sqlx::query_as::<_, RequestLine>(
            "SELECT * FROM request_lines WHERE request_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        for line in &lines {
            decrement_line(&mut tx, line.item_id, line.quantity).await?;
        }

        let request = sqlx::query_as::<_, CheckoutRequest>(
            "UPDATE checkout_requests SET status = 1, decision_date = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(RequestDetails { request, lines })
    }

    /// Reject a pending request
    pub async fn reject(&self, id: i32) -> AppResult<CheckoutRequest> {
        self.transition(id, RequestStatus::Pending, RequestStatus::Rejected, "rejected")
            .await
    }

    /// Record that the gear physically left the depot
    pub async fn mark_checked_out(&self, id: i32) -> AppResult<CheckoutRequest> {
        let mut tx = self.pool.begin().await?;

        let request = lock_request(&mut tx, id).await?;
        if request.status() != RequestStatus::Approved {
            return Err(AppError::Lifecycle(format!(
                "Request {} is {}, only approved requests can be checked out",
                id,
                request.status()
            )));
        }

        let request = sqlx::query_as::<_, CheckoutRequest>(
            "UPDATE checkout_requests SET status = 3, checkout_date = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(request)
    }

    /// Requester announces the gear is coming back; the affected items gain
    /// a pending check-in, which may flip their status label
    pub async fn request_return(&self, id: i32) -> AppResult<CheckoutRequest> {
        let mut tx = self.pool.begin().await?;

        let request = lock_request(&mut tx, id).await?;
        if request.status() != RequestStatus::CheckedOut {
            return Err(AppError::Lifecycle(format!(
                "Request {} is {}, only checked-out requests can start a return",
                id,
                request.status()
            )));
        }

        let request = sqlx::query_as::<_, CheckoutRequest>(
            "UPDATE checkout_requests SET status = 4 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        let lines = sqlx::query_as::<_, RequestLine>(
            "SELECT * FROM request_lines WHERE request_id = $1",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;
        for line in &lines {
            refresh_item_status(&mut tx, line.item_id).await?;
        }

        tx.commit().await?;
        Ok(request)
    }

    /// Confirm the return: put every line's units back (clamped at the item
    /// total) and close the request, all in one transaction
    pub async fn confirm_return(&self, id: i32) -> AppResult<ReturnReport> {
        let mut tx = self.pool.begin().await?;

        let request = lock_request(&mut tx, id).await?;
        if request.status() != RequestStatus::ReturnPending {
            return Err(AppError::Lifecycle(format!(
                "Request {} is {}, only pending returns can be confirmed",
                id,
                request.status()
            )));
        }

        // Close the request first so the pending check-in flag the status
        // projection reads is already cleared for these lines
        let request = sqlx::query_as::<_, CheckoutRequest>(
            "UPDATE checkout_requests SET status = 5, return_date = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        let lines = sqlx::query_as::<_, RequestLine>(
            "SELECT * FROM request_lines WHERE request_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let mut over_returns = Vec::new();
        for line in &lines {
            let outcome = increment_line(&mut tx, line.item_id, line.quantity).await?;
            if outcome.over_return > 0 {
                tracing::warn!(
                    item_id = line.item_id,
                    request_id = id,
                    over_return = outcome.over_return,
                    "over-return clamped at item total"
                );
                over_returns.push(outcome);
            }
        }

        tx.commit().await?;
        Ok(ReturnReport { request, over_returns })
    }

    /// Shared simple transition helper for single-step status moves
    async fn transition(
        &self,
        id: i32,
        from: RequestStatus,
        to: RequestStatus,
        verb: &str,
    ) -> AppResult<CheckoutRequest> {
        let mut tx = self.pool.begin().await?;

        let request = lock_request(&mut tx, id).await?;
        if request.status() != from {
            return Err(AppError::Lifecycle(format!(
                "Request {} is {}, cannot be {}",
                id,
                request.status(),
                verb
            )));
        }

        let request = sqlx::query_as::<_, CheckoutRequest>(
            "UPDATE checkout_requests SET status = $2, decision_date = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(i16::from(to))
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(request)
    }

    /// Count open requests (for stats)
    pub async fn count_open(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM checkout_requests WHERE status IN (0, 1, 3, 4)",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}

async fn lock_request(
    tx: &mut Transaction<'_, Postgres>,
    id: i32,
) -> AppResult<CheckoutRequest> {
    sqlx::query_as::<_, CheckoutRequest>(
        "SELECT * FROM checkout_requests WHERE id = $1 FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Checkout request {} not found", id)))
}

/// One line's compare-and-decrement inside the approval transaction
async fn decrement_line(
    tx: &mut Transaction<'_, Postgres>,
    item_id: i32,
    qty: i32,
) -> AppResult<()> {
    let row = sqlx::query(
        r#"
        UPDATE items
        SET quantity_available = quantity_available - $2, modif_date = NOW()
        WHERE id = $1 AND quantity_available >= $2 AND status < 4
        RETURNING quantity_available, quantity_total
        "#,
    )
    .bind(item_id)
    .bind(qty)
    .fetch_optional(&mut **tx)
    .await?;

    let (available, total): (i32, i32) = match row {
        Some(r) => (r.get("quantity_available"), r.get("quantity_total")),
        None => {
            let current: Option<i32> =
                sqlx::query_scalar("SELECT quantity_available FROM items WHERE id = $1 AND status < 4")
                    .bind(item_id)
                    .fetch_optional(&mut **tx)
                    .await?;
            return Err(match current {
                None => AppError::NotFound(format!("Item {} not found or not lendable", item_id)),
                Some(available) => AppError::InsufficientAvailability {
                    item_id,
                    requested: qty,
                    available,
                },
            });
        }
    };

    let pending = has_pending_checkin(tx, item_id).await?;
    let status = project_status(available, total, pending);
    sqlx::query("UPDATE items SET status = $2 WHERE id = $1")
        .bind(item_id)
        .bind(i16::from(status))
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// One line's clamped increment inside the return transaction
async fn increment_line(
    tx: &mut Transaction<'_, Postgres>,
    item_id: i32,
    qty: i32,
) -> AppResult<ReturnOutcome> {
    let row = sqlx::query(
        "SELECT quantity_available, quantity_total, status FROM items WHERE id = $1 FOR UPDATE",
    )
    .bind(item_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Item {} not found", item_id)))?;

    let available: i32 = row.get("quantity_available");
    let total: i32 = row.get("quantity_total");
    let stored = ItemStatus::from(row.get::<i16, _>("status"));

    let new_available = (available + qty).min(total);
    let over_return = (available + qty - total).max(0);

    let pending = has_pending_checkin(tx, item_id).await?;
    let status = if stored.is_administrative() {
        stored
    } else {
        project_status(new_available, total, pending)
    };

    sqlx::query(
        "UPDATE items SET quantity_available = $2, status = $3, modif_date = NOW() WHERE id = $1",
    )
    .bind(item_id)
    .bind(new_available)
    .bind(i16::from(status))
    .execute(&mut **tx)
    .await?;

    Ok(ReturnOutcome {
        item_id,
        quantity_available: new_available,
        quantity_total: total,
        status,
        over_return,
    })
}

/// Recompute one item's status label inside a transaction
async fn refresh_item_status(
    tx: &mut Transaction<'_, Postgres>,
    item_id: i32,
) -> AppResult<()> {
    let row = sqlx::query(
        "SELECT quantity_available, quantity_total, status FROM items WHERE id = $1 FOR UPDATE",
    )
    .bind(item_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Item {} not found", item_id)))?;

    let stored = ItemStatus::from(row.get::<i16, _>("status"));
    if stored.is_administrative() {
        return Ok(());
    }

    let pending = has_pending_checkin(tx, item_id).await?;
    let status = project_status(
        row.get("quantity_available"),
        row.get("quantity_total"),
        pending,
    );
    sqlx::query("UPDATE items SET status = $2 WHERE id = $1")
        .bind(item_id)
        .bind(i16::from(status))
        .execute(&mut **tx)
        .await?;
    Ok(())
}
