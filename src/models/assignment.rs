//! Vehicle assignment model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::enums::BookingStatus;

/// Assignment record: the fact that a vehicle is reserved for a booking.
/// A weak relation; deleted on cancellation, completion, or reassignment.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Assignment {
    pub id: i32,
    pub booking_id: i32,
    pub vehicle_id: i32,
    pub crea_date: DateTime<Utc>,
}

/// Assignment joined with its booking, as loaded for conflict checks
#[derive(Debug, Clone, FromRow)]
pub struct AssignmentWithBooking {
    pub booking_id: i32,
    pub vehicle_id: i32,
    pub booking_status: i16,
    pub date_of_use: NaiveDate,
    pub time_slot: String,
}

impl AssignmentWithBooking {
    pub fn booking_status(&self) -> BookingStatus {
        BookingStatus::from(self.booking_status)
    }
}
