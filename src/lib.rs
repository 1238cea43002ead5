//! Depot Equipment & Vehicle Reservation System
//!
//! A Rust implementation of the Depot reservation server, providing a REST
//! JSON API for a shared equipment pool: gear checkout requests, vehicle
//! bookings with exclusive assignments, and a reconciler that keeps the
//! denormalized status labels consistent with the availability counters.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
