use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::auth::model::{AdminSession, AdminUser};
use crate::features::auth::session::SessionState;

/// Request DTO for admin login
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Administrator info returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminUserDto {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: String,
}

impl From<AdminUser> for AdminUserDto {
    fn from(user: AdminUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
        }
    }
}

/// Response DTO for a successful admin login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponseDto {
    /// Access token to send as `Authorization: Bearer ...`
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token expiry time in seconds
    pub expires_in: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub user: AdminUserDto,
}

impl From<AdminSession> for AuthResponseDto {
    fn from(session: AdminSession) -> Self {
        Self {
            access_token: session.access_token,
            token_type: "Bearer".to_string(),
            expires_in: session.expires_in,
            refresh_token: session.refresh_token,
            user: session.user.into(),
        }
    }
}

/// Resolved session state for the presented token
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponseDto {
    /// `admin` or `anonymous`
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<AdminUserDto>,
}

impl From<&SessionState> for SessionResponseDto {
    fn from(state: &SessionState) -> Self {
        match state {
            SessionState::Admin(user) => Self {
                status: "admin".to_string(),
                user: Some(user.clone().into()),
            },
            // a settled context never reports loading
            SessionState::Loading | SessionState::Anonymous => Self {
                status: "anonymous".to_string(),
                user: None,
            },
        }
    }
}
