//! Assignments repository
//!
//! Assignments only exist for approved, not-yet-terminal bookings; release
//! deletes the row when the booking leaves that window. The unique index on
//! `assignments (vehicle_id)` is the second line of defense against two
//! stewards assigning the same vehicle concurrently — the service-level
//! conflict check is the first.

use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::assignment::{Assignment, AssignmentWithBooking},
};

#[derive(Clone)]
pub struct AssignmentsRepository {
    pool: Pool<Postgres>,
}

impl AssignmentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get the assignment held by a booking, if any
    pub async fn get_for_booking(&self, booking_id: i32) -> AppResult<Option<Assignment>> {
        let row = sqlx::query_as::<_, Assignment>(
            "SELECT * FROM assignments WHERE booking_id = $1",
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// All assignments on a vehicle, joined with their bookings, as the
    /// conflict check wants them
    pub async fn list_for_vehicle(&self, vehicle_id: i32) -> AppResult<Vec<AssignmentWithBooking>> {
        let rows = sqlx::query_as::<_, AssignmentWithBooking>(
            r#"
            SELECT a.booking_id, a.vehicle_id, b.status AS booking_status,
                   b.date_of_use, b.time_slot
            FROM assignments a
            JOIN bookings b ON a.booking_id = b.id
            WHERE a.vehicle_id = $1
            "#,
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Upsert the assignment for a booking and mark the vehicle checked out,
    /// in one transaction.
    ///
    /// A unique violation on the vehicle index means another steward won the
    /// race since the conflict check; it surfaces as VehicleLocked.
    pub async fn assign(&self, booking_id: i32, vehicle_id: i32) -> AppResult<Assignment> {
        let result = self.try_assign(booking_id, vehicle_id).await;

        match result {
            Err(AppError::Database(e)) if is_vehicle_unique_violation(&e) => {
                let holder: Option<i32> =
                    sqlx::query_scalar("SELECT booking_id FROM assignments WHERE vehicle_id = $1")
                        .bind(vehicle_id)
                        .fetch_optional(&self.pool)
                        .await?;
                match holder {
                    Some(holder_id) => Err(AppError::VehicleLocked {
                        vehicle_id,
                        booking_id: holder_id,
                    }),
                    None => Err(AppError::Database(e)),
                }
            }
            other => other,
        }
    }

    async fn try_assign(&self, booking_id: i32, vehicle_id: i32) -> AppResult<Assignment> {
        let mut tx = self.pool.begin().await?;

        // Reassignment frees the previously held vehicle
        let previous: Option<i32> = sqlx::query_scalar(
            "SELECT vehicle_id FROM assignments WHERE booking_id = $1 FOR UPDATE",
        )
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await?;

        let assignment = sqlx::query_as::<_, Assignment>(
            r#"
            INSERT INTO assignments (booking_id, vehicle_id)
            VALUES ($1, $2)
            ON CONFLICT (booking_id)
            DO UPDATE SET vehicle_id = EXCLUDED.vehicle_id, crea_date = NOW()
            RETURNING *
            "#,
        )
        .bind(booking_id)
        .bind(vehicle_id)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(prev) = previous {
            if prev != vehicle_id {
                sqlx::query("UPDATE vehicles SET status = 0 WHERE id = $1 AND status = 1")
                    .bind(prev)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        sqlx::query("UPDATE vehicles SET status = 1 WHERE id = $1 AND status = 0")
            .bind(vehicle_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(assignment)
    }

    /// Drop the assignment held by a booking and free the vehicle.
    /// Returns the freed vehicle id, or None when nothing was assigned.
    pub async fn release(&self, booking_id: i32) -> AppResult<Option<i32>> {
        let mut tx = self.pool.begin().await?;

        let released = sqlx::query(
            "DELETE FROM assignments WHERE booking_id = $1 RETURNING vehicle_id",
        )
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await?;

        let vehicle_id = match released {
            Some(row) => {
                let vehicle_id: i32 = row.get("vehicle_id");
                sqlx::query("UPDATE vehicles SET status = 0 WHERE id = $1 AND status = 1")
                    .bind(vehicle_id)
                    .execute(&mut *tx)
                    .await?;
                Some(vehicle_id)
            }
            None => None,
        };

        tx.commit().await?;
        Ok(vehicle_id)
    }
}

fn is_vehicle_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|d| d.constraint())
        .map(|c| c == "assignments_vehicle_id_key")
        .unwrap_or(false)
}
