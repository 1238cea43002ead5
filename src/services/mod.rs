//! Business logic services

pub mod allocator;
pub mod auth;
pub mod bookings;
pub mod fleet;
pub mod inventory;
pub mod reconciler;
pub mod requests;
pub mod stats;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub inventory: inventory::InventoryService,
    pub requests: requests::RequestsService,
    pub fleet: fleet::FleetService,
    pub allocator: allocator::AllocatorService,
    pub bookings: bookings::BookingsService,
    pub reconciler: reconciler::ReconcilerService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            inventory: inventory::InventoryService::new(repository.clone()),
            requests: requests::RequestsService::new(repository.clone()),
            fleet: fleet::FleetService::new(repository.clone()),
            allocator: allocator::AllocatorService::new(repository.clone()),
            bookings: bookings::BookingsService::new(repository.clone()),
            reconciler: reconciler::ReconcilerService::new(repository.clone()),
            stats: stats::StatsService::new(repository),
        }
    }
}
