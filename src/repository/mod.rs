//! Repository layer for database operations

pub mod assignments;
pub mod bookings;
pub mod items;
pub mod requests;
pub mod users;
pub mod vehicles;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub items: items::ItemsRepository,
    pub requests: requests::RequestsRepository,
    pub vehicles: vehicles::VehiclesRepository,
    pub bookings: bookings::BookingsRepository,
    pub assignments: assignments::AssignmentsRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            items: items::ItemsRepository::new(pool.clone()),
            requests: requests::RequestsRepository::new(pool.clone()),
            vehicles: vehicles::VehiclesRepository::new(pool.clone()),
            bookings: bookings::BookingsRepository::new(pool.clone()),
            assignments: assignments::AssignmentsRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            pool,
        }
    }
}
