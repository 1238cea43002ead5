//! Gear item endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        item::{AdjustTotal, CreateItem, Item, ReturnOutcome, UnitQuantity, UpdateItem},
        ItemStatus,
    },
};

use super::AuthenticatedUser;

/// Maintenance transition request
#[derive(Deserialize, ToSchema)]
pub struct MaintenanceRequest {
    /// "under_repair", "retired" or "in_service"
    pub state: MaintenanceState,
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceState {
    UnderRepair,
    Retired,
    InService,
}

/// List all items
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Item list", body = Vec<Item>)
    )
)]
pub async fn list_items(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Item>>> {
    let items = state.services.inventory.list().await?;
    Ok(Json(items))
}

/// Get item by ID
#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "items",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item details", body = Item),
        (status = 404, description = "Item not found")
    )
)]
pub async fn get_item(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Item>> {
    let item = state.services.inventory.get_by_id(id).await?;
    Ok(Json(item))
}

/// Create item (admin)
#[utoipa::path(
    post,
    path = "/items",
    tag = "items",
    security(("bearer_auth" = [])),
    request_body = CreateItem,
    responses(
        (status = 201, description = "Item created", body = Item)
    )
)]
pub async fn create_item(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateItem>,
) -> AppResult<(StatusCode, Json<Item>)> {
    claims.require_admin()?;
    data.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    let item = state.services.inventory.create(&data).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Update item descriptive fields (admin)
#[utoipa::path(
    put,
    path = "/items/{id}",
    tag = "items",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Item ID")),
    request_body = UpdateItem,
    responses(
        (status = 200, description = "Item updated", body = Item),
        (status = 404, description = "Item not found")
    )
)]
pub async fn update_item(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateItem>,
) -> AppResult<Json<Item>> {
    claims.require_admin()?;
    data.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    let item = state.services.inventory.update(id, &data).await?;
    Ok(Json(item))
}

/// Take units out of the pool (steward)
#[utoipa::path(
    post,
    path = "/items/{id}/checkout",
    tag = "items",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Item ID")),
    request_body = UnitQuantity,
    responses(
        (status = 200, description = "Units checked out", body = Item),
        (status = 404, description = "Item not found"),
        (status = 409, description = "Insufficient availability")
    )
)]
pub async fn checkout_units(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UnitQuantity>,
) -> AppResult<Json<Item>> {
    claims.require_steward()?;
    let item = state.services.inventory.approve_checkout(id, data.quantity).await?;
    Ok(Json(item))
}

/// Put units back into the pool (steward)
#[utoipa::path(
    post,
    path = "/items/{id}/return",
    tag = "items",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Item ID")),
    request_body = UnitQuantity,
    responses(
        (status = 200, description = "Units returned, excess clamped", body = ReturnOutcome),
        (status = 404, description = "Item not found")
    )
)]
pub async fn return_units(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UnitQuantity>,
) -> AppResult<Json<ReturnOutcome>> {
    claims.require_steward()?;
    let outcome = state.services.inventory.register_return(id, data.quantity).await?;
    Ok(Json(outcome))
}

/// Adjust the physical unit count (admin)
#[utoipa::path(
    post,
    path = "/items/{id}/adjust-total",
    tag = "items",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Item ID")),
    request_body = AdjustTotal,
    responses(
        (status = 200, description = "Total adjusted", body = Item),
        (status = 404, description = "Item not found"),
        (status = 409, description = "Cannot shrink below checked-out units")
    )
)]
pub async fn adjust_total(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<AdjustTotal>,
) -> AppResult<Json<Item>> {
    claims.require_admin()?;
    let item = state.services.inventory.adjust_total(id, data.new_total).await?;
    Ok(Json(item))
}

/// Move an item in or out of maintenance (admin)
#[utoipa::path(
    put,
    path = "/items/{id}/maintenance",
    tag = "items",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Item ID")),
    request_body = MaintenanceRequest,
    responses(
        (status = 200, description = "Item transitioned", body = Item),
        (status = 404, description = "Item not found")
    )
)]
pub async fn set_maintenance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<MaintenanceRequest>,
) -> AppResult<Json<Item>> {
    claims.require_admin()?;
    let item = match data.state {
        MaintenanceState::UnderRepair => {
            state
                .services
                .inventory
                .set_maintenance_status(id, ItemStatus::UnderRepair)
                .await?
        }
        MaintenanceState::Retired => {
            state
                .services
                .inventory
                .set_maintenance_status(id, ItemStatus::Retired)
                .await?
        }
        MaintenanceState::InService => state.services.inventory.return_to_service(id).await?,
    };
    Ok(Json(item))
}
