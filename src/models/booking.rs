//! Vehicle booking model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::BookingStatus;

/// Booking record: a request for a vehicle on a date and time slot.
/// A booking holds no vehicle until an assignment exists for it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Booking {
    pub id: i32,
    pub requester_id: i32,
    pub date_of_use: NaiveDate,
    /// Opaque slot label compared for equality ("09:00-12:00", "full-day")
    pub time_slot: String,
    pub purpose: Option<String>,
    /// Status per BookingStatus
    pub status: i16,
    pub crea_date: DateTime<Utc>,
    pub decision_date: Option<DateTime<Utc>>,
}

impl Booking {
    pub fn status(&self) -> BookingStatus {
        BookingStatus::from(self.status)
    }
}

/// Create booking request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBooking {
    pub date_of_use: NaiveDate,
    #[validate(length(min = 1, message = "Time slot must not be empty"))]
    pub time_slot: String,
    pub purpose: Option<String>,
}

/// Assignment request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignVehicle {
    pub vehicle_id: i32,
}
