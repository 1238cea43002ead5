//! Items repository: counter mutations and status writes
//!
//! Every `quantity_available`/`status` write in the system goes through this
//! module. The decrement path is a conditional update, never a read-then-write
//! pair, so concurrent checkouts against the same item cannot lose updates.

use chrono::Utc;
use sqlx::{Pool, Postgres, Row, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::{
        item::{project_status, CreateItem, Item, ItemSnapshot, ReturnOutcome, UpdateItem},
        ItemStatus,
    },
};

#[derive(Clone)]
pub struct ItemsRepository {
    pool: Pool<Postgres>,
}

impl ItemsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all items
    pub async fn list(&self) -> AppResult<Vec<Item>> {
        let rows = sqlx::query_as::<_, Item>("SELECT * FROM items ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get item by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Item> {
        sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item {} not found", id)))
    }

    /// Create item; a fresh pool starts fully available
    pub async fn create(&self, data: &CreateItem) -> AppResult<Item> {
        let status = project_status(data.quantity_total, data.quantity_total, false);
        let row = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (name, category, quantity_total, quantity_available, status, notes)
            VALUES ($1, $2, $3, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.category)
        .bind(data.quantity_total)
        .bind(i16::from(status))
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update descriptive fields
    pub async fn update(&self, id: i32, data: &UpdateItem) -> AppResult<Item> {
        let now = Utc::now();
        let mut sets = vec!["modif_date = $1".to_string()];
        let mut idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.name, "name");
        add_field!(data.category, "category");
        add_field!(data.notes, "notes");

        let query = format!(
            "UPDATE items SET {} WHERE id = {} RETURNING *",
            sets.join(", "),
            id
        );

        let mut builder = sqlx::query_as::<_, Item>(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.name);
        bind_field!(data.category);
        bind_field!(data.notes);

        builder
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item {} not found", id)))
    }

    /// Atomically take `qty` units out of the pool and refresh the status
    /// label, all in one transaction.
    ///
    /// The WHERE clause is the compare-and-decrement: it only matches while
    /// enough units remain and the item is in a lendable state (status 0..3).
    pub async fn approve_checkout(&self, item_id: i32, qty: i32) -> AppResult<Item> {
        let mut tx = self.pool.begin().await?;

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
        .fetch_optional(&mut *tx)
        .await?;

        let (available, total): (i32, i32) = match row {
            Some(r) => (r.get("quantity_available"), r.get("quantity_total")),
            None => {
                // Didn't match: missing item, out-of-service item, or not
                // enough units. Look again to report the right conflict.
                let current = sqlx::query(
                    "SELECT quantity_available, status FROM items WHERE id = $1",
                )
                .bind(item_id)
                .fetch_optional(&mut *tx)
                .await?;

                return match current {
                    None => Err(AppError::NotFound(format!("Item {} not found", item_id))),
                    Some(r) => {
                        let status = ItemStatus::from(r.get::<i16, _>("status"));
                        if status.is_administrative() {
                            Err(AppError::Lifecycle(format!(
                                "Item {} is {}, not lendable",
                                item_id,
                                status.to_string().to_lowercase()
                            )))
                        } else {
                            Err(AppError::InsufficientAvailability {
                                item_id,
                                requested: qty,
                                available: r.get("quantity_available"),
                            })
                        }
                    }
                };
            }
        };

        let pending = has_pending_checkin(&mut tx, item_id).await?;
        let status = project_status(available, total, pending);
        sqlx::query("UPDATE items SET status = $2 WHERE id = $1")
            .bind(item_id)
            .bind(i16::from(status))
            .execute(&mut *tx)
            .await?;

        let item = sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1")
            .bind(item_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(item)
    }

    /// Put `qty` units back into the pool, clamping at the total.
    ///
    /// The clamped excess comes back in the outcome so the caller can surface
    /// the anomaly; it is never silently dropped.
    pub async fn register_return(&self, item_id: i32, qty: i32) -> AppResult<ReturnOutcome> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "SELECT quantity_available, quantity_total, status FROM items WHERE id = $1 FOR UPDATE",
        )
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item {} not found", item_id)))?;

        let available: i32 = row.get("quantity_available");
        let total: i32 = row.get("quantity_total");
        let stored = ItemStatus::from(row.get::<i16, _>("status"));

        let new_available = (available + qty).min(total);
        let over_return = (available + qty - total).max(0);

        let pending = has_pending_checkin(&mut tx, item_id).await?;
        // Counters always move; the label is left alone while the item is in
        // an administrative state.
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
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ReturnOutcome {
            item_id,
            quantity_available: new_available,
            quantity_total: total,
            status,
            over_return,
        })
    }

    /// Administrative total adjustment. The checked-out count is preserved:
    /// the available count moves by the same delta as the total.
    pub async fn adjust_total(&self, item_id: i32, new_total: i32) -> AppResult<Item> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "SELECT quantity_available, quantity_total, status FROM items WHERE id = $1 FOR UPDATE",
        )
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item {} not found", item_id)))?;

        let available: i32 = row.get("quantity_available");
        let total: i32 = row.get("quantity_total");
        let stored = ItemStatus::from(row.get::<i16, _>("status"));
        let checked_out = total - available;

        if new_total < checked_out {
            return Err(AppError::InvalidAdjustment {
                item_id,
                new_total,
                checked_out,
            });
        }

        let new_available = new_total - checked_out;
        let pending = has_pending_checkin(&mut tx, item_id).await?;
        let status = if stored.is_administrative() {
            stored
        } else {
            project_status(new_available, new_total, pending)
        };

        sqlx::query(
            r#"
            UPDATE items
            SET quantity_total = $2, quantity_available = $3, status = $4, modif_date = NOW()
            WHERE id = $1
            "#,
        )
        .bind(item_id)
        .bind(new_total)
        .bind(new_available)
        .bind(i16::from(status))
        .execute(&mut *tx)
        .await?;

        let item = sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1")
            .bind(item_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(item)
    }

    /// Write a status label directly. Used by the reconciler with a projected
    /// value and by the administrative UnderRepair/Retired transitions.
    pub async fn set_status(&self, item_id: i32, status: ItemStatus) -> AppResult<()> {
        let result = sqlx::query("UPDATE items SET status = $2, modif_date = NOW() WHERE id = $1")
            .bind(item_id)
            .bind(i16::from(status))
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Item {} not found", item_id)));
        }
        Ok(())
    }

    /// Recompute the status label from the counters and the open request set
    /// (used when an item leaves UnderRepair)
    pub async fn refresh_status(&self, item_id: i32) -> AppResult<Item> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "SELECT quantity_available, quantity_total FROM items WHERE id = $1 FOR UPDATE",
        )
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item {} not found", item_id)))?;

        let pending = has_pending_checkin(&mut tx, item_id).await?;
        let status = project_status(
            row.get("quantity_available"),
            row.get("quantity_total"),
            pending,
        );

        let item = sqlx::query_as::<_, Item>(
            "UPDATE items SET status = $2, modif_date = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(item_id)
        .bind(i16::from(status))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(item)
    }

    /// Counter snapshots with derived request-set flags, for the reconciler.
    /// Request status codes: 1=Approved, 3=CheckedOut, 4=ReturnPending.
    pub async fn snapshots(&self) -> AppResult<Vec<ItemSnapshot>> {
        let rows = sqlx::query_as::<_, ItemSnapshot>(
            r#"
            SELECT i.id, i.name, i.quantity_total, i.quantity_available, i.status,
                   EXISTS(
                       SELECT 1 FROM request_lines rl
                       JOIN checkout_requests r ON rl.request_id = r.id
                       WHERE rl.item_id = i.id AND r.status IN (1, 3, 4)
                   ) AS has_outstanding_checkout,
                   EXISTS(
                       SELECT 1 FROM request_lines rl
                       JOIN checkout_requests r ON rl.request_id = r.id
                       WHERE rl.item_id = i.id AND r.status = 4
                   ) AS has_pending_checkin
            FROM items i
            ORDER BY i.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Sum counters for the stats endpoint
    pub async fn count_units(&self) -> AppResult<(i64, i64)> {
        let row = sqlx::query(
            r#"
            SELECT COALESCE(SUM(quantity_total), 0)::bigint AS total,
                   COALESCE(SUM(quantity_available), 0)::bigint AS available
            FROM items
            WHERE status < 4
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok((row.get("total"), row.get("available")))
    }
}

/// True while any open request holds a pending check-in line for the item
pub(crate) async fn has_pending_checkin(
    tx: &mut Transaction<'_, Postgres>,
    item_id: i32,
) -> AppResult<bool> {
    let pending: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM request_lines rl
            JOIN checkout_requests r ON rl.request_id = r.id
            WHERE rl.item_id = $1 AND r.status = 4
        )
        "#,
    )
    .bind(item_id)
    .fetch_one(&mut **tx)
    .await?;
    Ok(pending)
}
