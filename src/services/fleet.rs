//! Vehicle fleet service

use crate::{
    error::{AppError, AppResult},
    models::{
        vehicle::{CreateVehicle, UpdateVehicle, Vehicle},
        VehicleStatus,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct FleetService {
    repository: Repository,
}

impl FleetService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Vehicle>> {
        self.repository.vehicles.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Vehicle> {
        self.repository.vehicles.get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateVehicle) -> AppResult<Vehicle> {
        self.repository.vehicles.create(data).await
    }

    pub async fn update(&self, id: i32, data: &UpdateVehicle) -> AppResult<Vehicle> {
        self.repository.vehicles.update(id, data).await
    }

    /// Retire a vehicle. Refused while a booking still holds it.
    pub async fn retire(&self, id: i32) -> AppResult<Vehicle> {
        let vehicle = self.repository.vehicles.get_by_id(id).await?;
        if vehicle.status() == VehicleStatus::CheckedOut {
            return Err(AppError::Lifecycle(format!(
                "Vehicle {} is checked out and cannot be retired",
                id
            )));
        }
        self.repository.vehicles.set_status(id, VehicleStatus::Retired).await?;
        tracing::info!(vehicle_id = id, "vehicle retired");
        self.repository.vehicles.get_by_id(id).await
    }

    /// Bring a retired vehicle back into service
    pub async fn reactivate(&self, id: i32) -> AppResult<Vehicle> {
        let vehicle = self.repository.vehicles.get_by_id(id).await?;
        if vehicle.status() != VehicleStatus::Retired {
            return Err(AppError::Lifecycle(format!(
                "Vehicle {} is not retired",
                id
            )));
        }
        self.repository.vehicles.set_status(id, VehicleStatus::Active).await?;
        self.repository.vehicles.get_by_id(id).await
    }
}
