//! Vehicle model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::VehicleStatus;

/// Vehicle record; indivisible, never partially allocated
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Vehicle {
    pub id: i32,
    /// Display label ("Minibus 2")
    pub label: String,
    /// Registration plate
    pub plate: Option<String>,
    pub seats: Option<i16>,
    /// Status per VehicleStatus
    pub status: i16,
    pub notes: Option<String>,
    pub crea_date: Option<DateTime<Utc>>,
    pub modif_date: Option<DateTime<Utc>>,
}

impl Vehicle {
    pub fn status(&self) -> VehicleStatus {
        VehicleStatus::from(self.status)
    }
}

/// Create vehicle request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateVehicle {
    #[validate(length(min = 1, message = "Vehicle label must not be empty"))]
    pub label: String,
    pub plate: Option<String>,
    pub seats: Option<i16>,
    pub notes: Option<String>,
}

/// Update vehicle request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateVehicle {
    #[validate(length(min = 1, message = "Vehicle label must not be empty"))]
    pub label: Option<String>,
    pub plate: Option<String>,
    pub seats: Option<i16>,
    pub notes: Option<String>,
}
