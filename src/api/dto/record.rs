//! Parking record DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::Charge;
use crate::domain::ParkingRecord;

/// One occupancy episode of a slot by a vehicle
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": "0a1b2c3d-4e5f-6a7b-8c9d-0e1f2a3b4c5d",
    "slot_id": "9be2a3c4-7e0f-4e6f-9a51-1d2f3c4b5a69",
    "vehicle_id": "2f6b7a1e-3c4d-4f5a-8b9c-0d1e2f3a4b5c",
    "operator_id": "7c8d9e0f-1a2b-3c4d-5e6f-7a8b9c0d1e2f",
    "entry_time": "2026-08-30T08:00:00Z",
    "exit_time": "2026-08-30T10:15:00Z",
    "duration_hours": 3,
    "is_active": false,
    "is_paid": true
}))]
pub struct ParkingRecordDto {
    pub id: String,
    pub slot_id: String,
    pub vehicle_id: String,
    pub operator_id: String,
    pub entry_time: DateTime<Utc>,
    /// null while the vehicle is still parked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_time: Option<DateTime<Utc>>,
    /// Billed duration in whole hours, rounded up. null until release
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<i64>,
    pub is_active: bool,
    pub is_paid: bool,
}

impl ParkingRecordDto {
    pub fn from_domain(record: ParkingRecord) -> Self {
        Self {
            id: record.id,
            slot_id: record.slot_id,
            vehicle_id: record.vehicle_id,
            operator_id: record.operator_id,
            entry_time: record.entry_time,
            exit_time: record.exit_time,
            duration_hours: record.duration_hours,
            is_active: record.is_active,
            is_paid: record.is_paid,
        }
    }
}

/// Park a vehicle in a slot
#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({
    "slot_id": "9be2a3c4-7e0f-4e6f-9a51-1d2f3c4b5a69",
    "vehicle_id": "2f6b7a1e-3c4d-4f5a-8b9c-0d1e2f3a4b5c"
}))]
pub struct AssignVehicleRequest {
    pub slot_id: String,
    pub vehicle_id: String,
}

/// A quoted or settled charge for a record
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "duration_hours": 3,
    "amount": 1500,
    "currency": "RWF"
}))]
pub struct ChargeDto {
    /// Billable hours, rounded up, minimum 1
    pub duration_hours: i64,
    /// duration_hours × hourly rate
    pub amount: i64,
    pub currency: String,
}

impl ChargeDto {
    pub fn from_domain(charge: Charge) -> Self {
        Self {
            duration_hours: charge.duration_hours,
            amount: charge.amount,
            currency: charge.currency,
        }
    }
}
