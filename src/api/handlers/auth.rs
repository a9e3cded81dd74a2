//! Authentication and account handlers

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::error_response;
use crate::api::dto::ApiResponse;
use crate::api::extract::ValidatedJson;
use crate::api::router::ApiState;
use crate::auth::jwt::create_token;
use crate::auth::AuthenticatedUser;
use crate::application::NewOperator;
use crate::domain::User;

#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({ "username": "admin", "password": "admin123" }))]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub user: UserInfo,
}

/// Public view of an account. Never carries the password hash.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub phone_number: String,
    pub role: String,
}

impl UserInfo {
    fn from_user(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            phone_number: user.phone_number,
            role: user.role.as_str().to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "username": "operator1",
    "password": "s3cure-pass",
    "email": "operator1@smartpark.rw",
    "full_name": "Alice Uwase",
    "phone_number": "+250788333444"
}))]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
    #[validate(length(min = 1, max = 20))]
    pub phone_number: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<ApiState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, (StatusCode, Json<ApiResponse<LoginResponse>>)> {
    let user = state
        .identity
        .verify_credentials(&request.username, &request.password)
        .await
        .map_err(error_response)?;

    let role = user.role.as_str();
    let token = create_token(&user.id, &user.username, role, &state.jwt_config).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        )
    })?;

    Ok(Json(ApiResponse::success(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_config.expiration_hours * 3600,
        user: UserInfo::from_user(user),
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Operator account created", body = ApiResponse<UserInfo>),
        (status = 409, description = "Username already exists"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn register(
    State(state): State<ApiState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserInfo>>), (StatusCode, Json<ApiResponse<UserInfo>>)> {
    let user = state
        .identity
        .register_operator(NewOperator {
            username: request.username,
            password: request.password,
            email: request.email,
            full_name: request.full_name,
            phone_number: request.phone_number,
        })
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserInfo::from_user(user))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user info", body = ApiResponse<UserInfo>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_current_user(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<UserInfo>>, (StatusCode, Json<ApiResponse<UserInfo>>)> {
    let user = state
        .identity
        .get_user(&user.user_id)
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::success(UserInfo::from_user(user))))
}

#[utoipa::path(
    get,
    path = "/api/v1/operators",
    tag = "Operators",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All operator accounts", body = ApiResponse<Vec<UserInfo>>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_operators(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<UserInfo>>>, (StatusCode, Json<ApiResponse<Vec<UserInfo>>>)> {
    let operators = state
        .identity
        .list_operators(&user.actor())
        .await
        .map_err(error_response)?;

    let items = operators.into_iter().map(UserInfo::from_user).collect();
    Ok(Json(ApiResponse::success(items)))
}
