pub mod auth;
pub mod health;
pub mod parking;
pub mod payments;
pub mod reports;
pub mod slots;
pub mod vehicles;

use axum::http::StatusCode;
use axum::Json;

use crate::api::dto::ApiResponse;
use crate::domain::DomainError;

/// Map an engine error onto the response envelope.
///
/// Precondition failures (occupied slot, double payment, still-active
/// record) are conflicts, not validation errors: the request was well
/// formed, the state just does not allow it.
pub(super) fn error_response<T>(err: DomainError) -> (StatusCode, Json<ApiResponse<T>>) {
    let status = match &err {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::Conflict(_)
        | DomainError::SlotUnavailable(_)
        | DomainError::VehicleAlreadyParked(_)
        | DomainError::RecordStillActive(_)
        | DomainError::RecordNotActive(_)
        | DomainError::AlreadyPaid(_) => StatusCode::CONFLICT,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ApiResponse::error(err.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precondition_failures_map_to_conflict() {
        let (status, _) = error_response::<()>(DomainError::SlotUnavailable("A1-001".into()));
        assert_eq!(status, StatusCode::CONFLICT);
        let (status, _) = error_response::<()>(DomainError::AlreadyPaid("rec-1".into()));
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[test]
    fn lookups_and_access_map_to_their_statuses() {
        let (status, _) = error_response::<()>(DomainError::not_found("slot", "s-1"));
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = error_response::<()>(DomainError::Forbidden("nope".into()));
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = error_response::<()>(DomainError::Validation("bad zone".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
