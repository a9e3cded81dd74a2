//! Vehicle domain entity

use serde::{Deserialize, Serialize};

/// A registered vehicle, owned by exactly one operator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    /// Unique vehicle ID
    pub id: String,
    /// Licence plate number
    pub plate_number: String,
    /// Driver's display name
    pub driver_name: String,
    /// Driver's phone number
    pub phone_number: String,
    /// Owning operator's user ID
    pub operator_id: String,
}

impl Vehicle {
    pub fn new(
        plate_number: impl Into<String>,
        driver_name: impl Into<String>,
        phone_number: impl Into<String>,
        operator_id: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            plate_number: plate_number.into(),
            driver_name: driver_name.into(),
            phone_number: phone_number.into(),
            operator_id: operator_id.into(),
        }
    }
}
