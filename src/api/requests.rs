//! Checkout request endpoints

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
        request::{CheckoutRequest, CreateRequest, RequestDetails, ReturnReport},
        RequestStatus,
    },
};

use super::AuthenticatedUser;

/// Request list filter
#[derive(Deserialize, IntoParams, ToSchema)]
pub struct RequestQuery {
    /// Status code filter (0=pending, 1=approved, 2=rejected, 3=checked out,
    /// 4=return pending, 5=returned)
    pub status: Option<i16>,
}

/// List checkout requests (steward sees all, members their own)
#[utoipa::path(
    get,
    path = "/requests",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(RequestQuery),
    responses(
        (status = 200, description = "Request list", body = Vec<CheckoutRequest>)
    )
)]
pub async fn list_requests(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<RequestQuery>,
) -> AppResult<Json<Vec<CheckoutRequest>>> {
    let requests = if claims.is_steward() {
        state
            .services
            .requests
            .list(query.status.map(RequestStatus::from))
            .await?
    } else {
        state.services.requests.list_for_user(claims.user_id).await?
    };
    Ok(Json(requests))
}

/// Get a request with its lines
#[utoipa::path(
    get,
    path = "/requests/{id}",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request details", body = RequestDetails),
        (status = 404, description = "Request not found")
    )
)]
pub async fn get_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<RequestDetails>> {
    let details = state.services.requests.get_details(id).await?;
    if details.request.requester_id != claims.user_id && !claims.is_steward() {
        return Err(AppError::Authorization(
            "Not your request".to_string(),
        ));
    }
    Ok(Json(details))
}

/// File a checkout request
#[utoipa::path(
    post,
    path = "/requests",
    tag = "requests",
    security(("bearer_auth" = [])),
    request_body = CreateRequest,
    responses(
        (status = 201, description = "Request filed", body = RequestDetails),
        (status = 404, description = "Unknown item in a line")
    )
)]
pub async fn create_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateRequest>,
) -> AppResult<(StatusCode, Json<RequestDetails>)> {
    data.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    let details = state.services.requests.create(claims.user_id, &data).await?;
    Ok((StatusCode::CREATED, Json(details)))
}

/// Approve a pending request (steward); all lines or none
#[utoipa::path(
    post,
    path = "/requests/{id}/approve",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request approved", body = RequestDetails),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Insufficient availability on a line"),
        (status = 422, description = "Request not pending")
    )
)]
pub async fn approve_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<RequestDetails>> {
    claims.require_steward()?;
    let details = state.services.requests.approve(id).await?;
    Ok(Json(details))
}

/// Reject a pending request (steward)
#[utoipa::path(
    post,
    path = "/requests/{id}/reject",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request rejected", body = CheckoutRequest),
        (status = 422, description = "Request not pending")
    )
)]
pub async fn reject_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<CheckoutRequest>> {
    claims.require_steward()?;
    let request = state.services.requests.reject(id).await?;
    Ok(Json(request))
}

/// Record that the gear left the depot (steward)
#[utoipa::path(
    post,
    path = "/requests/{id}/checkout",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Gear handed out", body = CheckoutRequest),
        (status = 422, description = "Request not approved")
    )
)]
pub async fn checkout_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<CheckoutRequest>> {
    claims.require_steward()?;
    let request = state.services.requests.mark_checked_out(id).await?;
    Ok(Json(request))
}

/// Announce the gear is coming back (requester)
#[utoipa::path(
    post,
    path = "/requests/{id}/return",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Return pending", body = CheckoutRequest),
        (status = 422, description = "Request not checked out")
    )
)]
pub async fn return_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<CheckoutRequest>> {
    let request = state
        .services
        .requests
        .request_return(id, claims.user_id)
        .await?;
    Ok(Json(request))
}

/// Confirm the gear is back and close the request (steward)
#[utoipa::path(
    post,
    path = "/requests/{id}/confirm-return",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request closed", body = ReturnReport),
        (status = 422, description = "No return pending")
    )
)]
pub async fn confirm_return(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ReturnReport>> {
    claims.require_steward()?;
    let report = state.services.requests.confirm_return(id).await?;
    Ok(Json(report))
}
