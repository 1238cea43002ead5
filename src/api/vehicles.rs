//! Vehicle fleet endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::vehicle::{CreateVehicle, UpdateVehicle, Vehicle},
};

use super::AuthenticatedUser;

/// List all vehicles
#[utoipa::path(
    get,
    path = "/vehicles",
    tag = "vehicles",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Vehicle list", body = Vec<Vehicle>)
    )
)]
pub async fn list_vehicles(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Vehicle>>> {
    let vehicles = state.services.fleet.list().await?;
    Ok(Json(vehicles))
}

/// Get vehicle by ID
#[utoipa::path(
    get,
    path = "/vehicles/{id}",
    tag = "vehicles",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Vehicle details", body = Vehicle),
        (status = 404, description = "Vehicle not found")
    )
)]
pub async fn get_vehicle(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vehicle>> {
    let vehicle = state.services.fleet.get_by_id(id).await?;
    Ok(Json(vehicle))
}

/// Create vehicle (admin)
#[utoipa::path(
    post,
    path = "/vehicles",
    tag = "vehicles",
    security(("bearer_auth" = [])),
    request_body = CreateVehicle,
    responses(
        (status = 201, description = "Vehicle created", body = Vehicle)
    )
)]
pub async fn create_vehicle(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateVehicle>,
) -> AppResult<(StatusCode, Json<Vehicle>)> {
    claims.require_admin()?;
    data.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    let vehicle = state.services.fleet.create(&data).await?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

/// Update vehicle (admin)
#[utoipa::path(
    put,
    path = "/vehicles/{id}",
    tag = "vehicles",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Vehicle ID")),
    request_body = UpdateVehicle,
    responses(
        (status = 200, description = "Vehicle updated", body = Vehicle),
        (status = 404, description = "Vehicle not found")
    )
)]
pub async fn update_vehicle(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateVehicle>,
) -> AppResult<Json<Vehicle>> {
    claims.require_admin()?;
    data.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    let vehicle = state.services.fleet.update(id, &data).await?;
    Ok(Json(vehicle))
}

/// Retire a vehicle (admin)
#[utoipa::path(
    delete,
    path = "/vehicles/{id}",
    tag = "vehicles",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Vehicle retired", body = Vehicle),
        (status = 404, description = "Vehicle not found"),
        (status = 422, description = "Vehicle currently checked out")
    )
)]
pub async fn retire_vehicle(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vehicle>> {
    claims.require_admin()?;
    let vehicle = state.services.fleet.retire(id).await?;
    Ok(Json(vehicle))
}

/// Reactivate a retired vehicle (admin)
#[utoipa::path(
    post,
    path = "/vehicles/{id}/reactivate",
    tag = "vehicles",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Vehicle reactivated", body = Vehicle),
        (status = 422, description = "Vehicle not retired")
    )
)]
pub async fn reactivate_vehicle(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vehicle>> {
    claims.require_admin()?;
    let vehicle = state.services.fleet.reactivate(id).await?;
    Ok(Json(vehicle))
}
