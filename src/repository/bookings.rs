//! Bookings repository

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{Booking, CreateBooking},
        BookingStatus,
    },
};

#[derive(Clone)]
pub struct BookingsRepository {
    pool: Pool<Postgres>,
}

impl BookingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get booking by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))
    }

    /// List bookings, optionally filtered by status
    pub async fn list(&self, status: Option<BookingStatus>) -> AppResult<Vec<Booking>> {
        let rows = match status {
            Some(s) => {
                sqlx::query_as::<_, Booking>(
                    "SELECT * FROM bookings WHERE status = $1 ORDER BY date_of_use, time_slot",
                )
                .bind(i16::from(s))
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Booking>(
                    "SELECT * FROM bookings ORDER BY date_of_use, time_slot",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    /// List bookings filed by one user
    pub async fn list_for_user(&self, requester_id: i32) -> AppResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE requester_id = $1 ORDER BY date_of_use DESC",
        )
        .bind(requester_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Create booking
    pub async fn create(&self, requester_id: i32, data: &CreateBooking) -> AppResult<Booking> {
        let row = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (requester_id, date_of_use, time_slot, purpose, status)
            VALUES ($1, $2, $3, $4, 0)
            RETURNING *
            "#,
        )
        .bind(requester_id)
        .bind(data.date_of_use)
        .bind(&data.time_slot)
        .bind(&data.purpose)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Move a booking from one status to another, guarding the transition
    pub async fn transition(
        &self,
        id: i32,
        from: &[BookingStatus],
        to: BookingStatus,
    ) -> AppResult<Booking> {
        let mut tx = self.pool.begin().await?;

        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))?;

        if !from.contains(&booking.status()) {
            return Err(AppError::Lifecycle(format!(
                "Booking {} is {}, cannot move to {}",
                id,
                booking.status(),
                to
            )));
        }

        let booking = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = $2, decision_date = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(i16::from(to))
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(booking)
    }

    /// Count approved bookings (for stats)
    pub async fn count_approved(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE status = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
