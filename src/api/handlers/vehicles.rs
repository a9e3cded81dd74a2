//! Vehicle registry handlers
//!
//! Vehicles belong to the operator who registered them. Admins see
//! everything but own nothing, so vehicle creation is operator-only.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::error_response;
use crate::api::dto::{ApiResponse, CreateVehicleRequest, UpdateVehicleRequest, VehicleDto};
use crate::api::extract::ValidatedJson;
use crate::api::router::ApiState;
use crate::auth::AuthenticatedUser;
use crate::domain::{DomainError, Vehicle};

#[utoipa::path(
    get,
    path = "/api/v1/vehicles",
    tag = "Vehicles",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's vehicles, or all vehicles for admins", body = ApiResponse<Vec<VehicleDto>>)
    )
)]
pub async fn list_vehicles(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<VehicleDto>>>, (StatusCode, Json<ApiResponse<Vec<VehicleDto>>>)> {
    let vehicles = if user.is_admin() {
        state.store.list_vehicles().await
    } else {
        state.store.list_vehicles_for_operator(&user.user_id).await
    }
    .map_err(error_response)?;

    let items = vehicles.into_iter().map(VehicleDto::from_domain).collect();
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    post,
    path = "/api/v1/vehicles",
    tag = "Vehicles",
    security(("bearer_auth" = [])),
    request_body = CreateVehicleRequest,
    responses(
        (status = 201, description = "Vehicle registered", body = ApiResponse<VehicleDto>),
        (status = 403, description = "Admins do not own vehicles"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_vehicle(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VehicleDto>>), (StatusCode, Json<ApiResponse<VehicleDto>>)>
{
    if user.is_admin() {
        return Err(error_response(DomainError::Forbidden(
            "vehicles are registered under an operator account".to_string(),
        )));
    }

    let vehicle = Vehicle::new(
        &request.plate_number,
        &request.driver_name,
        &request.phone_number,
        &user.user_id,
    );
    state
        .store
        .save_vehicle(vehicle.clone())
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(VehicleDto::from_domain(vehicle))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/vehicles/{id}",
    tag = "Vehicles",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Vehicle ID")),
    request_body = UpdateVehicleRequest,
    responses(
        (status = 200, description = "Vehicle updated", body = ApiResponse<VehicleDto>),
        (status = 403, description = "Belongs to another operator"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_vehicle(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateVehicleRequest>,
) -> Result<Json<ApiResponse<VehicleDto>>, (StatusCode, Json<ApiResponse<VehicleDto>>)> {
    let mut vehicle = state
        .store
        .get_vehicle(&id)
        .await
        .map_err(error_response)?
        .ok_or_else(|| error_response(DomainError::not_found("vehicle", &id)))?;

    if !user.actor().can_access(&vehicle.operator_id) {
        return Err(error_response(DomainError::Forbidden(
            "vehicle belongs to another operator".to_string(),
        )));
    }

    if let Some(plate_number) = request.plate_number {
        vehicle.plate_number = plate_number;
    }
    if let Some(driver_name) = request.driver_name {
        vehicle.driver_name = driver_name;
    }
    if let Some(phone_number) = request.phone_number {
        vehicle.phone_number = phone_number;
    }

    state
        .store
        .update_vehicle(vehicle.clone())
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::success(VehicleDto::from_domain(vehicle))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/vehicles/{id}",
    tag = "Vehicles",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Vehicle deleted"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Vehicle is currently parked")
    )
)]
pub async fn delete_vehicle(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    let vehicle = state
        .store
        .get_vehicle(&id)
        .await
        .map_err(error_response)?
        .ok_or_else(|| error_response(DomainError::not_found("vehicle", &id)))?;

    if !user.actor().can_access(&vehicle.operator_id) {
        return Err(error_response(DomainError::Forbidden(
            "vehicle belongs to another operator".to_string(),
        )));
    }

    // A parked vehicle would leave its record dangling.
    if state
        .store
        .get_active_record_for_vehicle(&id)
        .await
        .map_err(error_response)?
        .is_some()
    {
        return Err(error_response(DomainError::Conflict(format!(
            "vehicle {} is currently parked",
            vehicle.plate_number
        ))));
    }

    state
        .store
        .delete_vehicle(&id)
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::success(())))
}
