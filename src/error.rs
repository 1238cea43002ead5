//! Error types for Depot server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Application error codes returned in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    NotAuthorized = 2,
    DbFailure = 3,
    NoSuchData = 4,
    BadValue = 5,
    Duplicate = 6,
    InsufficientAvailability = 7,
    InvalidAdjustment = 8,
    VehicleUnavailable = 9,
    SlotConflict = 10,
    VehicleLocked = 11,
    LifecycleViolation = 12,
    DataIntegrity = 13,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Item {item_id}: requested {requested} units but only {available} available")]
    InsufficientAvailability {
        item_id: i32,
        requested: i32,
        available: i32,
    },

    #[error("Item {item_id}: cannot shrink total to {new_total}, {checked_out} units are checked out")]
    InvalidAdjustment {
        item_id: i32,
        new_total: i32,
        checked_out: i32,
    },

    #[error("Vehicle {vehicle_id} is not in service")]
    VehicleUnavailable { vehicle_id: i32 },

    #[error("Vehicle {vehicle_id} is already reserved by booking {booking_id} for {date_of_use} ({time_slot})")]
    SlotConflict {
        vehicle_id: i32,
        booking_id: i32,
        date_of_use: NaiveDate,
        time_slot: String,
    },

    #[error("Vehicle {vehicle_id} is held by outstanding booking {booking_id} until it completes")]
    VehicleLocked { vehicle_id: i32, booking_id: i32 },

    #[error("Item {item_id} counters out of bounds: {available}/{total}")]
    DataIntegrity {
        item_id: i32,
        available: i32,
        total: i32,
    },

    #[error("Lifecycle violation: {0}")]
    Lifecycle(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Authentication(msg) => {
                (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthorized, msg.clone())
            }
            AppError::Authorization(msg) => {
                (StatusCode::FORBIDDEN, ErrorCode::NotAuthorized, msg.clone())
            }
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchData, msg.clone())
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::Duplicate(msg) => {
                (StatusCode::CONFLICT, ErrorCode::Duplicate, msg.clone())
            }
            AppError::InsufficientAvailability { .. } => (
                StatusCode::CONFLICT,
                ErrorCode::InsufficientAvailability,
                self.to_string(),
            ),
            AppError::InvalidAdjustment { .. } => (
                StatusCode::CONFLICT,
                ErrorCode::InvalidAdjustment,
                self.to_string(),
            ),
            AppError::VehicleUnavailable { .. } => (
                StatusCode::CONFLICT,
                ErrorCode::VehicleUnavailable,
                self.to_string(),
            ),
            AppError::SlotConflict { .. } => {
                (StatusCode::CONFLICT, ErrorCode::SlotConflict, self.to_string())
            }
            AppError::VehicleLocked { .. } => {
                (StatusCode::CONFLICT, ErrorCode::VehicleLocked, self.to_string())
            }
            AppError::DataIntegrity { .. } => {
                tracing::error!("Data integrity failure: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DataIntegrity,
                    self.to_string(),
                )
            }
            AppError::Lifecycle(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorCode::LifecycleViolation,
                msg.clone(),
            ),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

/// Store errors worth a single retry before surfacing
pub fn is_transient_store_error(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut)
}
