//! Statistics service

use crate::{api::stats::StatsResponse, error::AppResult, repository::Repository};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Depot-wide counters for the dashboard
    pub async fn get_stats(&self) -> AppResult<StatsResponse> {
        let (units_total, units_available) = self.repository.items.count_units().await?;
        let open_requests = self.repository.requests.count_open().await?;
        let approved_bookings = self.repository.bookings.count_approved().await?;
        let active_vehicles = self.repository.vehicles.count_active().await?;

        Ok(StatsResponse {
            units_total,
            units_available,
            open_requests,
            approved_bookings,
            active_vehicles,
        })
    }
}
