//! Slot inventory handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::error_response;
use crate::api::dto::{ApiResponse, ProvisionSlotsRequest, SlotDto};
use crate::api::extract::ValidatedJson;
use crate::api::router::ApiState;
use crate::auth::AuthenticatedUser;
use crate::domain::SlotStatus;

/// Occupancy counters for the whole lot
#[derive(Debug, Serialize, ToSchema)]
pub struct SlotListResponse {
    pub slots: Vec<SlotDto>,
    pub total: usize,
    pub available: usize,
    pub occupied: usize,
    pub reserved: usize,
}

#[utoipa::path(
    get,
    path = "/api/v1/slots",
    tag = "Slots",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All slots, ordered by slot number", body = ApiResponse<SlotListResponse>)
    )
)]
pub async fn list_slots(
    State(state): State<ApiState>,
) -> Result<Json<ApiResponse<SlotListResponse>>, (StatusCode, Json<ApiResponse<SlotListResponse>>)>
{
    let slots = state.inventory.list_slots().await.map_err(error_response)?;

    let mut available = 0;
    let mut occupied = 0;
    let mut reserved = 0;
    for slot in &slots {
        match slot.status {
            SlotStatus::Available => available += 1,
            SlotStatus::Occupied => occupied += 1,
            SlotStatus::Reserved => reserved += 1,
        }
    }

    let response = SlotListResponse {
        total: slots.len(),
        available,
        occupied,
        reserved,
        slots: slots.into_iter().map(SlotDto::from_domain).collect(),
    };
    Ok(Json(ApiResponse::success(response)))
}

#[utoipa::path(
    get,
    path = "/api/v1/slots/{id}",
    tag = "Slots",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Slot ID")),
    responses(
        (status = 200, description = "Slot details", body = ApiResponse<SlotDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_slot(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<SlotDto>>, (StatusCode, Json<ApiResponse<SlotDto>>)> {
    let slot = state
        .occupancy
        .get_slot(&id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(SlotDto::from_domain(slot))))
}

#[utoipa::path(
    post,
    path = "/api/v1/slots/provision",
    tag = "Slots",
    security(("bearer_auth" = [])),
    request_body = ProvisionSlotsRequest,
    responses(
        (status = 201, description = "Slots created", body = ApiResponse<Vec<SlotDto>>),
        (status = 403, description = "Admin only"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn provision_slots(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<ProvisionSlotsRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<SlotDto>>>), (StatusCode, Json<ApiResponse<Vec<SlotDto>>>)>
{
    let slots = state
        .inventory
        .provision_slots(&user.actor(), &request.zone, request.level, request.count)
        .await
        .map_err(error_response)?;

    let items = slots.into_iter().map(SlotDto::from_domain).collect();
    Ok((StatusCode::CREATED, Json(ApiResponse::success(items))))
}
