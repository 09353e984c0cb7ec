use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::constants::ROLE_ADMIN;

/// Operator record from the `users` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AdminUser {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub role: String,
}

impl AdminUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// Account as known to the identity provider
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProviderUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Tokens returned by a successful password grant
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: i64,
    pub user: ProviderUser,
}

/// A signed-in administrator and the tokens that prove it
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: i64,
    pub user: AdminUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_admin() {
        let mut user = AdminUser {
            id: Uuid::now_v7(),
            email: "ops@example.com".to_string(),
            name: None,
            role: "admin".to_string(),
        };
        assert!(user.is_admin());

        user.role = "editor".to_string();
        assert!(!user.is_admin());

        user.role = "Admin".to_string();
        assert!(!user.is_admin());
    }

    #[test]
    fn test_provider_session_deserialize() {
        let session: ProviderSession = serde_json::from_value(serde_json::json!({
            "access_token": "at",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "rt",
            "user": { "id": "0b6c7e0e-1d1a-4c55-9a53-8a3f1e0b1c2d", "email": "ops@example.com", "aud": "authenticated" }
        }))
        .unwrap();

        assert_eq!(session.access_token, "at");
        assert_eq!(session.expires_in, 3600);
        assert_eq!(session.user.email.as_deref(), Some("ops@example.com"));
    }
}
