//! Parking record handlers: assign, release, quote and pay-to-release

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use super::error_response;
use crate::api::dto::{
    ApiResponse, AssignVehicleRequest, ChargeDto, ParkingRecordDto, PayAndReleaseRequest,
    PaymentDto,
};
use crate::api::router::ApiState;
use crate::auth::AuthenticatedUser;
use crate::domain::{DomainError, PaymentMethod};

/// Record and payment produced by a pay-to-release call
#[derive(Debug, Serialize, ToSchema)]
pub struct PayAndReleaseResponse {
    pub record: ParkingRecordDto,
    pub payment: PaymentDto,
}

#[utoipa::path(
    get,
    path = "/api/v1/parking-records",
    tag = "Parking",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's records, or all records for admins", body = ApiResponse<Vec<ParkingRecordDto>>)
    )
)]
pub async fn list_records(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<
    Json<ApiResponse<Vec<ParkingRecordDto>>>,
    (StatusCode, Json<ApiResponse<Vec<ParkingRecordDto>>>),
> {
    let records = if user.is_admin() {
        state.store.list_records().await
    } else {
        state.store.list_records_for_operator(&user.user_id).await
    }
    .map_err(error_response)?;

    let items = records
        .into_iter()
        .map(ParkingRecordDto::from_domain)
        .collect();
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    get,
    path = "/api/v1/parking-records/{id}",
    tag = "Parking",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Parking record ID")),
    responses(
        (status = 200, description = "Record details", body = ApiResponse<ParkingRecordDto>),
        (status = 403, description = "Belongs to another operator"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_record(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ParkingRecordDto>>, (StatusCode, Json<ApiResponse<ParkingRecordDto>>)>
{
    let record = fetch_accessible_record(&state, &user, &id).await?;
    Ok(Json(ApiResponse::success(ParkingRecordDto::from_domain(
        record,
    ))))
}

#[utoipa::path(
    post,
    path = "/api/v1/parking-records",
    tag = "Parking",
    security(("bearer_auth" = [])),
    request_body = AssignVehicleRequest,
    responses(
        (status = 201, description = "Vehicle parked", body = ApiResponse<ParkingRecordDto>),
        (status = 404, description = "Slot or vehicle not found"),
        (status = 409, description = "Slot occupied or vehicle already parked")
    )
)]
pub async fn assign_vehicle(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<AssignVehicleRequest>,
) -> Result<
    (StatusCode, Json<ApiResponse<ParkingRecordDto>>),
    (StatusCode, Json<ApiResponse<ParkingRecordDto>>),
> {
    let record = state
        .occupancy
        .assign_vehicle(
            &user.actor(),
            &request.slot_id,
            &request.vehicle_id,
            Utc::now(),
        )
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ParkingRecordDto::from_domain(record))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/parking-records/{id}/quote",
    tag = "Parking",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Parking record ID")),
    responses(
        (status = 200, description = "Current charge: settled figures for a closed record, a live quote otherwise", body = ApiResponse<ChargeDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn quote(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ChargeDto>>, (StatusCode, Json<ApiResponse<ChargeDto>>)> {
    let record = fetch_accessible_record(&state, &user, &id).await?;
    let charge = state.billing.quote(&record, Utc::now());
    Ok(Json(ApiResponse::success(ChargeDto::from_domain(charge))))
}

#[utoipa::path(
    post,
    path = "/api/v1/parking-records/{id}/release",
    tag = "Parking",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Parking record ID")),
    responses(
        (status = 200, description = "Slot released, record closed and awaiting payment", body = ApiResponse<ParkingRecordDto>),
        (status = 409, description = "Record already released")
    )
)]
pub async fn release_slot(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ParkingRecordDto>>, (StatusCode, Json<ApiResponse<ParkingRecordDto>>)>
{
    let record = state
        .occupancy
        .release_slot(&user.actor(), &id, Utc::now())
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::success(ParkingRecordDto::from_domain(
        record,
    ))))
}

#[utoipa::path(
    post,
    path = "/api/v1/parking-records/{id}/pay",
    tag = "Parking",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Parking record ID")),
    request_body = PayAndReleaseRequest,
    responses(
        (status = 200, description = "Record settled and slot freed in one step", body = ApiResponse<PayAndReleaseResponse>),
        (status = 409, description = "Record already released or already paid")
    )
)]
pub async fn pay_and_release(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(request): Json<PayAndReleaseRequest>,
) -> Result<
    Json<ApiResponse<PayAndReleaseResponse>>,
    (StatusCode, Json<ApiResponse<PayAndReleaseResponse>>),
> {
    let method = parse_method(&request.method).map_err(error_response)?;
    let (record, payment) = state
        .billing
        .pay_and_release(&user.actor(), &id, method, Utc::now())
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::success(PayAndReleaseResponse {
        record: ParkingRecordDto::from_domain(record),
        payment: PaymentDto::from_domain(payment),
    })))
}

pub(super) fn parse_method(value: &str) -> Result<PaymentMethod, DomainError> {
    PaymentMethod::parse(value).ok_or_else(|| {
        DomainError::Validation(format!(
            "unknown payment method '{}', expected cash, card or mobile",
            value
        ))
    })
}

async fn fetch_accessible_record<T>(
    state: &ApiState,
    user: &AuthenticatedUser,
    id: &str,
) -> Result<crate::domain::ParkingRecord, (StatusCode, Json<ApiResponse<T>>)> {
    let record = state
        .store
        .get_record(id)
        .await
        .map_err(error_response)?
        .ok_or_else(|| error_response(DomainError::not_found("parking record", id)))?;

    if !user.actor().can_access(&record.operator_id) {
        return Err(error_response(DomainError::Forbidden(
            "parking record belongs to another operator".to_string(),
        )));
    }
    Ok(record)
}
