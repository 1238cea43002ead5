//! Gear item pool model and status projection

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::ItemStatus;

/// Gear item record: a pool of interchangeable indivisible units
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Item {
    pub id: i32,
    /// Item name / description
    pub name: String,
    /// Free-form category label ("camping", "av", ...)
    pub category: Option<String>,
    /// Total physical unit count
    pub quantity_total: i32,
    /// Units currently in the pool (0 <= available <= total)
    pub quantity_available: i32,
    /// Status label per ItemStatus; derived except UnderRepair/Retired
    pub status: i16,
    pub notes: Option<String>,
    pub crea_date: Option<DateTime<Utc>>,
    pub modif_date: Option<DateTime<Utc>>,
}

impl Item {
    pub fn status(&self) -> ItemStatus {
        ItemStatus::from(self.status)
    }

    /// Units currently out with requesters
    pub fn checked_out(&self) -> i32 {
        self.quantity_total - self.quantity_available
    }
}

/// Create item request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateItem {
    #[validate(length(min = 1, message = "Item name must not be empty"))]
    pub name: String,
    pub category: Option<String>,
    #[validate(range(min = 0, message = "Total quantity must be non-negative"))]
    pub quantity_total: i32,
    pub notes: Option<String>,
}

/// Update item request (descriptive fields only; counters go through the
/// ledger operations)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateItem {
    #[validate(length(min = 1, message = "Item name must not be empty"))]
    pub name: Option<String>,
    pub category: Option<String>,
    pub notes: Option<String>,
}

/// Administrative total adjustment
#[derive(Debug, Deserialize, ToSchema)]
pub struct AdjustTotal {
    pub new_total: i32,
}

/// Quantity payload for direct checkout/return ledger operations
#[derive(Debug, Deserialize, ToSchema)]
pub struct UnitQuantity {
    pub quantity: i32,
}

/// Outcome of a return registration
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReturnOutcome {
    pub item_id: i32,
    pub quantity_available: i32,
    pub quantity_total: i32,
    pub status: ItemStatus,
    /// Units above the total that were clamped away, 0 when the return fit
    pub over_return: i32,
}

/// Counter snapshot used by the reconciler; the flags are derived from the
/// open request set at read time
#[derive(Debug, Clone, FromRow)]
pub struct ItemSnapshot {
    pub id: i32,
    pub name: String,
    pub quantity_total: i32,
    pub quantity_available: i32,
    pub status: i16,
    pub has_outstanding_checkout: bool,
    pub has_pending_checkin: bool,
}

impl ItemSnapshot {
    pub fn status(&self) -> ItemStatus {
        ItemStatus::from(self.status)
    }
}

/// Status projection: the one place a derived status label comes from.
///
/// UnderRepair and Retired are never produced here; they are administrative
/// states the ledger and the reconciler leave alone.
pub fn project_status(
    quantity_available: i32,
    quantity_total: i32,
    has_pending_checkin: bool,
) -> ItemStatus {
    if quantity_total > 0 && quantity_available == 0 {
        ItemStatus::CheckedOut
    } else if quantity_available > 0 && quantity_available < quantity_total {
        ItemStatus::PartiallyAvailable
    } else if has_pending_checkin {
        ItemStatus::PendingCheckIn
    } else {
        ItemStatus::Available
    }
}
