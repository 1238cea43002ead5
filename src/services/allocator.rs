//! Vehicle booking allocator
//!
//! Decides whether a vehicle can be reserved for a booking and records the
//! assignment. A vehicle with any outstanding approved booking is treated as
//! checked out until that booking completes, regardless of dates; only the
//! same date and slot is reported as the harder SlotConflict.

use std::time::Duration;

use crate::{
    error::{is_transient_store_error, AppError, AppResult},
    models::{
        assignment::{Assignment, AssignmentWithBooking},
        booking::Booking,
        BookingStatus, VehicleStatus,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AllocatorService {
    repository: Repository,
}

impl AllocatorService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Reserve a vehicle for an approved booking.
    ///
    /// The assignment write carries a unique constraint on the vehicle, so a
    /// race that slips past the conflict check still cannot double-book.
    pub async fn assign(&self, booking_id: i32, vehicle_id: i32) -> AppResult<Assignment> {
        let booking = self.repository.bookings.get_by_id(booking_id).await?;
        if booking.status() != BookingStatus::Approved {
            return Err(AppError::Lifecycle(format!(
                "Booking {} is {}, only approved bookings can be assigned a vehicle",
                booking_id,
                booking.status()
            )));
        }

        let vehicle = self.repository.vehicles.get_by_id(vehicle_id).await?;
        if vehicle.status() == VehicleStatus::Retired {
            return Err(AppError::VehicleUnavailable { vehicle_id });
        }

        let existing = self.repository.assignments.list_for_vehicle(vehicle_id).await?;
        check_vehicle_conflicts(&booking, &existing)?;

        let assignment = match self.repository.assignments.assign(booking_id, vehicle_id).await {
            Err(AppError::Database(e)) if is_transient_store_error(&e) => {
                tracing::warn!(error = %e, "transient store error, retrying once");
                tokio::time::sleep(Duration::from_millis(50)).await;
                self.repository.assignments.assign(booking_id, vehicle_id).await?
            }
            other => other?,
        };
        tracing::info!(booking_id, vehicle_id, "vehicle assigned");
        Ok(assignment)
    }

    /// Drop a booking's assignment and free the vehicle
    pub async fn release(&self, booking_id: i32) -> AppResult<Option<i32>> {
        let released = self.repository.assignments.release(booking_id).await?;
        if let Some(vehicle_id) = released {
            tracing::info!(booking_id, vehicle_id, "vehicle released");
        }
        Ok(released)
    }

    pub async fn get_for_booking(&self, booking_id: i32) -> AppResult<Option<Assignment>> {
        self.repository.assignments.get_for_booking(booking_id).await
    }
}

/// Conflict check against the vehicle's current assignment set.
///
/// Only approved bookings other than the one being assigned count. A clash on
/// the exact date and slot is a SlotConflict; any other outstanding approved
/// booking locks the vehicle outright until it completes.
pub fn check_vehicle_conflicts(
    booking: &Booking,
    existing: &[AssignmentWithBooking],
) -> AppResult<()> {
    let candidates: Vec<&AssignmentWithBooking> = existing
        .iter()
        .filter(|a| a.booking_id != booking.id)
        .filter(|a| a.booking_status() == BookingStatus::Approved)
        .collect();

    if let Some(clash) = candidates
        .iter()
        .find(|a| a.date_of_use == booking.date_of_use && a.time_slot == booking.time_slot)
    {
        return Err(AppError::SlotConflict {
            vehicle_id: clash.vehicle_id,
            booking_id: clash.booking_id,
            date_of_use: clash.date_of_use,
            time_slot: clash.time_slot.clone(),
        });
    }

    if let Some(holder) = candidates.first() {
        return Err(AppError::VehicleLocked {
            vehicle_id: holder.vehicle_id,
            booking_id: holder.booking_id,
        });
    }

    Ok(())
}
