use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, BearerToken};
use crate::features::auth::dtos::{
    AdminUserDto, AuthResponseDto, LoginRequestDto, SessionResponseDto,
};
use crate::features::auth::guards::RequireAdmin;
use crate::features::auth::services::AuthGateway;
use crate::features::auth::session::SessionContext;
use crate::shared::types::ApiResponse;
use axum::{extract::State, Json};
use std::sync::Arc;
use validator::Validate;

/// Admin login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<AuthResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account is not an administrator")
    ),
    tag = "auth"
)]
pub async fn login(
    State(gateway): State<Arc<AuthGateway>>,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<Json<ApiResponse<AuthResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let mut context = SessionContext::new();
    let session = context
        .sign_in(&gateway, dto.email.trim(), &dto.password)
        .await?;

    Ok(Json(ApiResponse::success(
        Some(AuthResponseDto::from(session)),
        None,
        None,
    )))
}

/// End the current session
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Signed out"),
        (status = 401, description = "Missing token"),
        (status = 502, description = "Identity provider rejected the sign-out")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn logout(
    State(gateway): State<Arc<AuthGateway>>,
    BearerToken(token): BearerToken,
) -> Result<Json<ApiResponse<()>>> {
    let mut context = SessionContext::new();
    context.sign_out(&gateway, &token).await?;

    Ok(Json(ApiResponse::success(
        None,
        Some("Signed out".to_string()),
        None,
    )))
}

/// Resolve the session behind the presented token (if any)
#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Session state", body = ApiResponse<SessionResponseDto>)
    ),
    tag = "auth"
)]
pub async fn get_session(
    State(gateway): State<Arc<AuthGateway>>,
    token: Option<BearerToken>,
) -> Result<Json<ApiResponse<SessionResponseDto>>> {
    let mut context = SessionContext::new();
    context
        .hydrate(&gateway, token.as_ref().map(|t| t.0.as_str()))
        .await;

    Ok(Json(ApiResponse::success(
        Some(SessionResponseDto::from(context.state())),
        None,
        None,
    )))
}

/// Get the signed-in administrator
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current administrator", body = ApiResponse<AdminUserDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(RequireAdmin(user): RequireAdmin) -> Result<Json<ApiResponse<AdminUserDto>>> {
    Ok(Json(ApiResponse::success(Some(user.into()), None, None)))
}
