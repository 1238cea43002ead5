//! Consistency validation and reconciliation endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::issue::{ReconcileReport, ValidationReport},
};

use super::AuthenticatedUser;

/// Report drifted items without writing anything (steward)
#[utoipa::path(
    get,
    path = "/consistency/validate",
    tag = "consistency",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Validation report", body = ValidationReport)
    )
)]
pub async fn validate(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ValidationReport>> {
    claims.require_steward()?;
    let report = state.services.reconciler.validate().await?;
    Ok(Json(report))
}

/// Repair every correctable drifted item (steward)
#[utoipa::path(
    post,
    path = "/consistency/reconcile",
    tag = "consistency",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Reconcile report", body = ReconcileReport)
    )
)]
pub async fn reconcile(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ReconcileReport>> {
    claims.require_steward()?;
    let report = state.services.reconciler.reconcile().await?;
    Ok(Json(report))
}
