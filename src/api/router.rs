//! API router with Swagger UI

use std::sync::Arc;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{
    BillingService, IdentityService, InventoryService, OccupancyService, ReportService,
};
use crate::auth::jwt::JwtConfig;
use crate::auth::{auth_middleware, AuthState};
use crate::infrastructure::Store;

use super::dto;
use super::handlers::{auth, health, parking, payments, reports, slots, vehicles};

/// Shared state for every route. Axum hands the middleware its
/// `AuthState` slice via `FromRef`.
#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<dyn Store>,
    pub occupancy: Arc<OccupancyService>,
    pub billing: Arc<BillingService>,
    pub inventory: Arc<InventoryService>,
    pub identity: Arc<IdentityService>,
    pub reports: Arc<ReportService>,
    pub jwt_config: JwtConfig,
}

impl FromRef<ApiState> for AuthState {
    fn from_ref(s: &ApiState) -> Self {
        AuthState {
            jwt_config: s.jwt_config.clone(),
        }
    }
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::login,
        auth::register,
        auth::get_current_user,
        auth::list_operators,
        // Slots
        slots::list_slots,
        slots::get_slot,
        slots::provision_slots,
        // Vehicles
        vehicles::list_vehicles,
        vehicles::create_vehicle,
        vehicles::update_vehicle,
        vehicles::delete_vehicle,
        // Parking records
        parking::list_records,
        parking::get_record,
        parking::assign_vehicle,
        parking::quote,
        parking::release_slot,
        parking::pay_and_release,
        // Payments
        payments::list_payments,
        payments::record_payment,
        payments::download_receipt,
        // Reports
        reports::daily_report,
        reports::operator_summary,
    ),
    components(
        schemas(
            dto::ApiResponse<String>,
            dto::EmptyData,
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::RegisterRequest,
            auth::UserInfo,
            // Slots
            dto::SlotDto,
            dto::ProvisionSlotsRequest,
            slots::SlotListResponse,
            // Vehicles
            dto::VehicleDto,
            dto::CreateVehicleRequest,
            dto::UpdateVehicleRequest,
            // Parking records
            dto::ParkingRecordDto,
            dto::AssignVehicleRequest,
            dto::ChargeDto,
            dto::PayAndReleaseRequest,
            parking::PayAndReleaseResponse,
            // Payments
            dto::PaymentDto,
            dto::RecordPaymentRequest,
            dto::ReceiptDto,
            // Reports
            dto::DailyReportDto,
            dto::DailyStatsDto,
            dto::OperatorSummaryDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Authentication", description = "Login (JWT) and operator registration"),
        (name = "Slots", description = "Slot inventory and provisioning"),
        (name = "Vehicles", description = "Vehicle registry, scoped per operator"),
        (name = "Parking", description = "Assign, release, quote and pay-to-release"),
        (name = "Payments", description = "Settlement of released parking records and receipts"),
        (name = "Operators", description = "Operator accounts and per-operator aggregates"),
        (name = "Reports", description = "Daily revenue and activity reports"),
    ),
    info(
        title = "SmartPark API",
        version = "1.0.0",
        description = "REST API for parking lot occupancy and billing",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(state: ApiState) -> Router {
    let middleware_state = AuthState {
        jwt_config: state.jwt_config.clone(),
    };

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .with_state(state.clone());

    // Auth routes (protected)
    let auth_protected_routes = Router::new()
        .route("/me", get(auth::get_current_user))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(state.clone());

    // Everything else requires a valid token
    let protected_routes = Router::new()
        .route("/slots", get(slots::list_slots))
        .route("/slots/provision", post(slots::provision_slots))
        .route("/slots/{id}", get(slots::get_slot))
        .route(
            "/vehicles",
            get(vehicles::list_vehicles).post(vehicles::create_vehicle),
        )
        .route(
            "/vehicles/{id}",
            put(vehicles::update_vehicle).delete(vehicles::delete_vehicle),
        )
        .route(
            "/parking-records",
            get(parking::list_records).post(parking::assign_vehicle),
        )
        .route("/parking-records/{id}", get(parking::get_record))
        .route("/parking-records/{id}/quote", get(parking::quote))
        .route("/parking-records/{id}/release", post(parking::release_slot))
        .route("/parking-records/{id}/pay", post(parking::pay_and_release))
        .route(
            "/payments",
            get(payments::list_payments).post(payments::record_payment),
        )
        .route("/payments/{id}/receipt", get(payments::download_receipt))
        .route("/operators", get(auth::list_operators))
        .route("/operators/{id}/summary", get(reports::operator_summary))
        .route("/reports/daily", get(reports::daily_report))
        .layer(middleware::from_fn_with_state(
            middleware_state,
            auth_middleware,
        ))
        .with_state(state);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .route("/health", get(health::health_check))
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/auth", auth_protected_routes)
        .nest("/api/v1", protected_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
