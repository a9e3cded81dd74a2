//! Slot DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::Slot;

/// A parking slot
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": "9be2a3c4-7e0f-4e6f-9a51-1d2f3c4b5a69",
    "slot_number": "A1-003",
    "zone": "A",
    "level": 1,
    "location": "Zone A, Level 1",
    "status": "available"
}))]
pub struct SlotDto {
    pub id: String,
    /// Human-readable slot number, unique per lot
    pub slot_number: String,
    pub zone: String,
    pub level: u32,
    /// Display location, derived from zone and level
    pub location: String,
    /// `available`, `occupied` or `reserved`
    pub status: String,
}

impl SlotDto {
    pub fn from_domain(slot: Slot) -> Self {
        Self {
            location: slot.location(),
            id: slot.id,
            slot_number: slot.slot_number,
            zone: slot.zone,
            level: slot.level,
            status: slot.status.to_string(),
        }
    }
}

/// Admin request to add slots to the inventory
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "zone": "A",
    "level": 1,
    "count": 10
}))]
pub struct ProvisionSlotsRequest {
    /// Zone tag, alphabetic (e.g. `A`)
    #[validate(length(min = 1, max = 4))]
    pub zone: String,
    pub level: u32,
    /// Number of slots to create (1-200)
    #[validate(range(min = 1, max = 200))]
    pub count: u32,
}
