//! Statistics endpoint

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;

use super::AuthenticatedUser;

/// Depot-wide counters
#[derive(Serialize, ToSchema)]
pub struct StatsResponse {
    /// Physical gear units across all in-service items
    pub units_total: i64,
    /// Units currently in the pool
    pub units_available: i64,
    /// Requests not yet returned or rejected
    pub open_requests: i64,
    /// Approved vehicle bookings
    pub approved_bookings: i64,
    /// Vehicles not retired
    pub active_vehicles: i64,
}

/// Get depot statistics
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Depot statistics", body = StatsResponse)
    )
)]
pub async fn get_stats(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<StatsResponse>> {
    let stats = state.services.stats.get_stats().await?;
    Ok(Json(stats))
}
