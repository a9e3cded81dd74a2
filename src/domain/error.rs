use thiserror::Error;

/// Engine-level errors. All of these are recoverable: the API boundary maps
/// them to a response and the process keeps running. Preconditions are
/// deterministic, so a failed call fails identically on retry; recovery is
/// user-driven (pick another slot, refresh the view).
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with id={id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Slot {0} is not available")]
    SlotUnavailable(String),

    #[error("Vehicle {0} is already parked in another slot")]
    VehicleAlreadyParked(String),

    #[error("Parking record {0} is still active, release it before paying")]
    RecordStillActive(String),

    #[error("Parking record {0} has already been released")]
    RecordNotActive(String),

    #[error("Parking record {0} has already been paid")]
    AlreadyPaid(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for engine operations
pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}
