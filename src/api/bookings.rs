//! Vehicle booking endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        assignment::Assignment,
        booking::{AssignVehicle, Booking, CreateBooking},
        BookingStatus,
    },
};

use super::AuthenticatedUser;

/// Booking list filter
#[derive(Deserialize, IntoParams, ToSchema)]
pub struct BookingQuery {
    /// Status code filter (0=pending, 1=approved, 2=rejected, 3=cancelled,
    /// 4=completed)
    pub status: Option<i16>,
}

/// List bookings (steward sees all, members their own)
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(BookingQuery),
    responses(
        (status = 200, description = "Booking list", body = Vec<Booking>)
    )
)]
pub async fn list_bookings(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<BookingQuery>,
) -> AppResult<Json<Vec<Booking>>> {
    let bookings = if claims.is_steward() {
        state
            .services
            .bookings
            .list(query.status.map(BookingStatus::from))
            .await?
    } else {
        state.services.bookings.list_for_user(claims.user_id).await?
    };
    Ok(Json(bookings))
}

/// Get booking by ID
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking details", body = Booking),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Booking>> {
    let booking = state.services.bookings.get_by_id(id).await?;
    if booking.requester_id != claims.user_id && !claims.is_steward() {
        return Err(AppError::Authorization("Not your booking".to_string()));
    }
    Ok(Json(booking))
}

/// File a booking
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    security(("bearer_auth" = [])),
    request_body = CreateBooking,
    responses(
        (status = 201, description = "Booking filed", body = Booking)
    )
)]
pub async fn create_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateBooking>,
) -> AppResult<(StatusCode, Json<Booking>)> {
    data.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    let booking = state.services.bookings.create(claims.user_id, &data).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// Approve a pending booking (steward)
#[utoipa::path(
    post,
    path = "/bookings/{id}/approve",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking approved", body = Booking),
        (status = 422, description = "Booking not pending")
    )
)]
pub async fn approve_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Booking>> {
    claims.require_steward()?;
    let booking = state.services.bookings.approve(id).await?;
    Ok(Json(booking))
}

/// Reject a pending booking (steward)
#[utoipa::path(
    post,
    path = "/bookings/{id}/reject",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking rejected", body = Booking),
        (status = 422, description = "Booking not pending")
    )
)]
pub async fn reject_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Booking>> {
    claims.require_steward()?;
    let booking = state.services.bookings.reject(id).await?;
    Ok(Json(booking))
}

/// Cancel a booking (requester or steward); any held vehicle is freed
#[utoipa::path(
    post,
    path = "/bookings/{id}/cancel",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking cancelled", body = Booking),
        (status = 422, description = "Booking already terminal")
    )
)]
pub async fn cancel_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Booking>> {
    let booking = state
        .services
        .bookings
        .cancel(id, claims.user_id, claims.is_steward())
        .await?;
    Ok(Json(booking))
}

/// Complete an approved booking (steward); the vehicle comes back
#[utoipa::path(
    post,
    path = "/bookings/{id}/complete",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking completed", body = Booking),
        (status = 422, description = "Booking not approved")
    )
)]
pub async fn complete_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Booking>> {
    claims.require_steward()?;
    let booking = state.services.bookings.complete(id).await?;
    Ok(Json(booking))
}

/// Reserve a vehicle for an approved booking (steward)
#[utoipa::path(
    post,
    path = "/bookings/{id}/assign",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    request_body = AssignVehicle,
    responses(
        (status = 200, description = "Vehicle assigned", body = Assignment),
        (status = 404, description = "Booking or vehicle not found"),
        (status = 409, description = "Slot conflict or vehicle locked/retired"),
        (status = 422, description = "Booking not approved")
    )
)]
pub async fn assign_vehicle(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<AssignVehicle>,
) -> AppResult<Json<Assignment>> {
    claims.require_steward()?;
    let assignment = state.services.allocator.assign(id, data.vehicle_id).await?;
    Ok(Json(assignment))
}

/// Drop a booking's vehicle assignment (steward)
#[utoipa::path(
    delete,
    path = "/bookings/{id}/assignment",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 204, description = "Assignment released"),
        (status = 404, description = "No assignment held")
    )
)]
pub async fn release_assignment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_steward()?;
    match state.services.allocator.release(id).await? {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(AppError::NotFound(format!(
            "Booking {} holds no assignment",
            id
        ))),
    }
}
