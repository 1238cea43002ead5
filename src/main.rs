//! Depot Server - Equipment & Vehicle Reservation System
//!
//! A Rust REST API server for shared equipment and vehicle management.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use depot_server::{
    api,
    config::AppConfig,
    repository::Repository,
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("depot_server={},tower_http=debug", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Depot Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, config.auth.clone());

    // First run on an empty database gets an administrator account
    services
        .auth
        .ensure_bootstrap_admin()
        .await
        .expect("Failed to bootstrap administrator");

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        // Users
        .route("/users", get(api::auth::list_users))
        .route("/users", post(api::auth::create_user))
        // Items & ledger operations
        .route("/items", get(api::items::list_items))
        .route("/items", post(api::items::create_item))
        .route("/items/:id", get(api::items::get_item))
        .route("/items/:id", put(api::items::update_item))
        .route("/items/:id/checkout", post(api::items::checkout_units))
        .route("/items/:id/return", post(api::items::return_units))
        .route("/items/:id/adjust-total", post(api::items::adjust_total))
        .route("/items/:id/maintenance", put(api::items::set_maintenance))
        // Checkout requests
        .route("/requests", get(api::requests::list_requests))
        .route("/requests", post(api::requests::create_request))
        .route("/requests/:id", get(api::requests::get_request))
        .route("/requests/:id/approve", post(api::requests::approve_request))
        .route("/requests/:id/reject", post(api::requests::reject_request))
        .route("/requests/:id/checkout", post(api::requests::checkout_request))
        .route("/requests/:id/return", post(api::requests::return_request))
        .route("/requests/:id/confirm-return", post(api::requests::confirm_return))
        // Vehicles
        .route("/vehicles", get(api::vehicles::list_vehicles))
        .route("/vehicles", post(api::vehicles::create_vehicle))
        .route("/vehicles/:id", get(api::vehicles::get_vehicle))
        .route("/vehicles/:id", put(api::vehicles::update_vehicle))
        .route("/vehicles/:id", delete(api::vehicles::retire_vehicle))
        .route("/vehicles/:id/reactivate", post(api::vehicles::reactivate_vehicle))
        // Bookings & assignments
        .route("/bookings", get(api::bookings::list_bookings))
        .route("/bookings", post(api::bookings::create_booking))
        .route("/bookings/:id", get(api::bookings::get_booking))
        .route("/bookings/:id/approve", post(api::bookings::approve_booking))
        .route("/bookings/:id/reject", post(api::bookings::reject_booking))
        .route("/bookings/:id/cancel", post(api::bookings::cancel_booking))
        .route("/bookings/:id/complete", post(api::bookings::complete_booking))
        .route("/bookings/:id/assign", post(api::bookings::assign_vehicle))
        .route("/bookings/:id/assignment", delete(api::bookings::release_assignment))
        // Consistency
        .route("/consistency/validate", get(api::consistency::validate))
        .route("/consistency/reconcile", post(api::consistency::reconcile))
        // Statistics
        .route("/stats", get(api::stats::get_stats))
        .with_state(state.clone());

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
