//! Shared domain enums

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// ItemStatus
// ---------------------------------------------------------------------------

/// Denormalized availability label for a gear item pool.
///
/// Available through PendingCheckIn are derived from the counters and the
/// open request set (see [`project_status`](crate::models::item::project_status));
/// UnderRepair and Retired are set only by explicit administrative action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[repr(i16)]
pub enum ItemStatus {
    Available = 0,
    PartiallyAvailable = 1,
    CheckedOut = 2,
    PendingCheckIn = 3,
    UnderRepair = 4,
    Retired = 5,
}

impl ItemStatus {
    /// True for the states only an administrator may enter or leave.
    pub fn is_administrative(self) -> bool {
        matches!(self, ItemStatus::UnderRepair | ItemStatus::Retired)
    }
}

impl From<i16> for ItemStatus {
    fn from(v: i16) -> Self {
        match v {
            1 => ItemStatus::PartiallyAvailable,
            2 => ItemStatus::CheckedOut,
            3 => ItemStatus::PendingCheckIn,
            4 => ItemStatus::UnderRepair,
            5 => ItemStatus::Retired,
            _ => ItemStatus::Available,
        }
    }
}

impl From<ItemStatus> for i16 {
    fn from(s: ItemStatus) -> Self {
        s as i16
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ItemStatus::Available => "Available",
            ItemStatus::PartiallyAvailable => "Partially available",
            ItemStatus::CheckedOut => "Checked out",
            ItemStatus::PendingCheckIn => "Pending check-in",
            ItemStatus::UnderRepair => "Under repair",
            ItemStatus::Retired => "Retired",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// RequestStatus
// ---------------------------------------------------------------------------

/// Checkout request lifecycle.
///
/// Pending -> Approved | Rejected; Approved -> CheckedOut -> ReturnPending
/// -> Returned. ReturnPending is the pending check-in state the status
/// projection looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[repr(i16)]
pub enum RequestStatus {
    Pending = 0,
    Approved = 1,
    Rejected = 2,
    CheckedOut = 3,
    ReturnPending = 4,
    Returned = 5,
}

impl RequestStatus {
    /// Units are out of the pool while a request is in one of these states.
    pub fn holds_units(self) -> bool {
        matches!(
            self,
            RequestStatus::Approved | RequestStatus::CheckedOut | RequestStatus::ReturnPending
        )
    }
}

impl From<i16> for RequestStatus {
    fn from(v: i16) -> Self {
        match v {
            1 => RequestStatus::Approved,
            2 => RequestStatus::Rejected,
            3 => RequestStatus::CheckedOut,
            4 => RequestStatus::ReturnPending,
            5 => RequestStatus::Returned,
            _ => RequestStatus::Pending,
        }
    }
}

impl From<RequestStatus> for i16 {
    fn from(s: RequestStatus) -> Self {
        s as i16
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Approved => "Approved",
            RequestStatus::Rejected => "Rejected",
            RequestStatus::CheckedOut => "Checked out",
            RequestStatus::ReturnPending => "Return pending",
            RequestStatus::Returned => "Returned",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// VehicleStatus
// ---------------------------------------------------------------------------

/// Vehicle status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[repr(i16)]
pub enum VehicleStatus {
    Active = 0,
    CheckedOut = 1,
    Retired = 2,
}

impl From<i16> for VehicleStatus {
    fn from(v: i16) -> Self {
        match v {
            1 => VehicleStatus::CheckedOut,
            2 => VehicleStatus::Retired,
            _ => VehicleStatus::Active,
        }
    }
}

impl From<VehicleStatus> for i16 {
    fn from(s: VehicleStatus) -> Self {
        s as i16
    }
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            VehicleStatus::Active => "Active",
            VehicleStatus::CheckedOut => "Checked out",
            VehicleStatus::Retired => "Retired",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// BookingStatus
// ---------------------------------------------------------------------------

/// Vehicle booking lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[repr(i16)]
pub enum BookingStatus {
    Pending = 0,
    Approved = 1,
    Rejected = 2,
    Cancelled = 3,
    Completed = 4,
}

impl BookingStatus {
    /// Terminal bookings no longer hold any vehicle.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            BookingStatus::Rejected | BookingStatus::Cancelled | BookingStatus::Completed
        )
    }
}

impl From<i16> for BookingStatus {
    fn from(v: i16) -> Self {
        match v {
            1 => BookingStatus::Approved,
            2 => BookingStatus::Rejected,
            3 => BookingStatus::Cancelled,
            4 => BookingStatus::Completed,
            _ => BookingStatus::Pending,
        }
    }
}

impl From<BookingStatus> for i16 {
    fn from(s: BookingStatus) -> Self {
        s as i16
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Approved => "Approved",
            BookingStatus::Rejected => "Rejected",
            BookingStatus::Cancelled => "Cancelled",
            BookingStatus::Completed => "Completed",
        };
        write!(f, "{}", label)
    }
}
