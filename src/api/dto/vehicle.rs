//! Vehicle DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::Vehicle;

/// A registered vehicle
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": "2f6b7a1e-3c4d-4f5a-8b9c-0d1e2f3a4b5c",
    "plate_number": "RAB 123 C",
    "driver_name": "Jean Bosco",
    "phone_number": "+250788111222",
    "operator_id": "7c8d9e0f-1a2b-3c4d-5e6f-7a8b9c0d1e2f"
}))]
pub struct VehicleDto {
    pub id: String,
    pub plate_number: String,
    pub driver_name: String,
    pub phone_number: String,
    /// Owning operator's user ID
    pub operator_id: String,
}

impl VehicleDto {
    pub fn from_domain(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            plate_number: vehicle.plate_number,
            driver_name: vehicle.driver_name,
            phone_number: vehicle.phone_number,
            operator_id: vehicle.operator_id,
        }
    }
}

/// Register a vehicle under the calling operator
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "plate_number": "RAB 123 C",
    "driver_name": "Jean Bosco",
    "phone_number": "+250788111222"
}))]
pub struct CreateVehicleRequest {
    #[validate(length(min = 1, max = 20))]
    pub plate_number: String,
    #[validate(length(min = 1, max = 100))]
    pub driver_name: String,
    #[validate(length(min = 1, max = 20))]
    pub phone_number: String,
}

/// Update a vehicle's details. Ownership never changes.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 1, max = 20))]
    pub plate_number: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub driver_name: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub phone_number: Option<String>,
}
