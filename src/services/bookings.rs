//! Booking lifecycle service

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{Booking, CreateBooking},
        BookingStatus,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BookingsService {
    repository: Repository,
}

impl BookingsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Booking> {
        self.repository.bookings.get_by_id(id).await
    }

    pub async fn list(&self, status: Option<BookingStatus>) -> AppResult<Vec<Booking>> {
        self.repository.bookings.list(status).await
    }

    pub async fn list_for_user(&self, requester_id: i32) -> AppResult<Vec<Booking>> {
        self.repository.bookings.list_for_user(requester_id).await
    }

    pub async fn create(&self, requester_id: i32, data: &CreateBooking) -> AppResult<Booking> {
        self.repository.users.get_by_id(requester_id).await?;
        let booking = self.repository.bookings.create(requester_id, data).await?;
        tracing::info!(
            booking_id = booking.id,
            requester_id,
            date_of_use = %booking.date_of_use,
            time_slot = %booking.time_slot,
            "booking filed"
        );
        Ok(booking)
    }

    pub async fn approve(&self, id: i32) -> AppResult<Booking> {
        self.repository
            .bookings
            .transition(id, &[BookingStatus::Pending], BookingStatus::Approved)
            .await
    }

    pub async fn reject(&self, id: i32) -> AppResult<Booking> {
        self.repository
            .bookings
            .transition(id, &[BookingStatus::Pending], BookingStatus::Rejected)
            .await
    }

    /// Cancel a booking; any held vehicle is freed
    pub async fn cancel(&self, id: i32, requester_id: i32, is_steward: bool) -> AppResult<Booking> {
        let booking = self.repository.bookings.get_by_id(id).await?;
        if booking.requester_id != requester_id && !is_steward {
            return Err(AppError::Authorization(
                "Only the requester or a steward can cancel a booking".to_string(),
            ));
        }

        let booking = self
            .repository
            .bookings
            .transition(
                id,
                &[BookingStatus::Pending, BookingStatus::Approved],
                BookingStatus::Cancelled,
            )
            .await?;
        self.release_vehicle(id).await?;
        Ok(booking)
    }

    /// Mark an approved booking completed; the vehicle comes back to the pool
    pub async fn complete(&self, id: i32) -> AppResult<Booking> {
        let booking = self
            .repository
            .bookings
            .transition(id, &[BookingStatus::Approved], BookingStatus::Completed)
            .await?;
        self.release_vehicle(id).await?;
        Ok(booking)
    }

    async fn release_vehicle(&self, booking_id: i32) -> AppResult<()> {
        if let Some(vehicle_id) = self.repository.assignments.release(booking_id).await? {
            tracing::info!(booking_id, vehicle_id, "vehicle released");
        }
        Ok(())
    }
}
