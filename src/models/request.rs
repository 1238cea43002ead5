//! Checkout request model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::RequestStatus;
use super::item::ReturnOutcome;

/// Checkout request from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CheckoutRequest {
    pub id: i32,
    pub requester_id: i32,
    /// Status per RequestStatus
    pub status: i16,
    pub notes: Option<String>,
    pub crea_date: DateTime<Utc>,
    /// When the request was approved or rejected
    pub decision_date: Option<DateTime<Utc>>,
    /// When the gear physically left the depot
    pub checkout_date: Option<DateTime<Utc>>,
    pub return_date: Option<DateTime<Utc>>,
}

impl CheckoutRequest {
    pub fn status(&self) -> RequestStatus {
        RequestStatus::from(self.status)
    }
}

/// One line of a checkout request
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RequestLine {
    pub id: i32,
    pub request_id: i32,
    pub item_id: i32,
    pub quantity: i32,
}

/// Request with its lines for display
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RequestDetails {
    #[serde(flatten)]
    pub request: CheckoutRequest,
    pub lines: Vec<RequestLine>,
}

/// Line of a create request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateRequestLine {
    pub item_id: i32,
    #[validate(range(min = 1, message = "Line quantity must be positive"))]
    pub quantity: i32,
}

/// Create checkout request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRequest {
    #[validate(length(min = 1, message = "A request needs at least one line"), nested)]
    pub lines: Vec<CreateRequestLine>,
    pub notes: Option<String>,
}

/// Outcome of confirming a return: the closed request plus any clamped
/// over-return anomalies, one per affected item
#[derive(Debug, Serialize, ToSchema)]
pub struct ReturnReport {
    pub request: CheckoutRequest,
    pub over_returns: Vec<ReturnOutcome>,
}
