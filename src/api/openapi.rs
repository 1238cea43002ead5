//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, bookings, consistency, health, items, requests, stats, vehicles};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Depot API",
        version = "1.0.0",
        description = "Equipment & Vehicle Reservation System REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        auth::list_users,
        auth::create_user,
        // Items
        items::list_items,
        items::get_item,
        items::create_item,
        items::update_item,
        items::checkout_units,
        items::return_units,
        items::adjust_total,
        items::set_maintenance,
        // Requests
        requests::list_requests,
        requests::get_request,
        requests::create_request,
        requests::approve_request,
        requests::reject_request,
        requests::checkout_request,
        requests::return_request,
        requests::confirm_return,
        // Vehicles
        vehicles::list_vehicles,
        vehicles::get_vehicle,
        vehicles::create_vehicle,
        vehicles::update_vehicle,
        vehicles::retire_vehicle,
        vehicles::reactivate_vehicle,
        // Bookings
        bookings::list_bookings,
        bookings::get_booking,
        bookings::create_booking,
        bookings::approve_booking,
        bookings::reject_booking,
        bookings::cancel_booking,
        bookings::complete_booking,
        bookings::assign_vehicle,
        bookings::release_assignment,
        // Consistency
        consistency::validate,
        consistency::reconcile,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            crate::models::user::CreateUser,
            crate::models::user::RoleSlug,
            // Items
            crate::models::item::Item,
            crate::models::item::CreateItem,
            crate::models::item::UpdateItem,
            crate::models::item::AdjustTotal,
            crate::models::item::UnitQuantity,
            crate::models::item::ReturnOutcome,
            crate::models::enums::ItemStatus,
            items::MaintenanceRequest,
            items::MaintenanceState,
            // Requests
            crate::models::request::CheckoutRequest,
            crate::models::request::RequestLine,
            crate::models::request::RequestDetails,
            crate::models::request::CreateRequest,
            crate::models::request::CreateRequestLine,
            crate::models::request::ReturnReport,
            crate::models::enums::RequestStatus,
            // Vehicles
            crate::models::vehicle::Vehicle,
            crate::models::vehicle::CreateVehicle,
            crate::models::vehicle::UpdateVehicle,
            crate::models::enums::VehicleStatus,
            // Bookings
            crate::models::booking::Booking,
            crate::models::booking::CreateBooking,
            crate::models::booking::AssignVehicle,
            crate::models::assignment::Assignment,
            crate::models::enums::BookingStatus,
            // Consistency
            crate::models::issue::ConsistencyIssue,
            crate::models::issue::IssueKind,
            crate::models::issue::ValidationReport,
            crate::models::issue::ReconcileReport,
            // Stats
            stats::StatsResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User management"),
        (name = "items", description = "Gear item pools and ledger operations"),
        (name = "requests", description = "Checkout request lifecycle"),
        (name = "vehicles", description = "Vehicle fleet management"),
        (name = "bookings", description = "Vehicle bookings and assignments"),
        (name = "consistency", description = "Drift detection and repair"),
        (name = "stats", description = "Statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
