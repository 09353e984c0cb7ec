use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::clients::IdentityProvider;
use crate::features::auth::model::{AdminSession, AdminUser, ProviderUser};
use crate::features::auth::repositories::AdminDirectory;

/// Admin sign-in on top of the identity provider plus the `users` role table.
///
/// Holding a valid provider session is not enough: the account must also be
/// listed with role `admin`. A successful password grant for any other account
/// is revoked before the error is returned.
pub struct AuthGateway {
    identity: Arc<dyn IdentityProvider>,
    directory: Arc<dyn AdminDirectory>,
}

impl AuthGateway {
    pub fn new(identity: Arc<dyn IdentityProvider>, directory: Arc<dyn AdminDirectory>) -> Self {
        Self {
            identity,
            directory,
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AdminSession> {
        let session = self.identity.sign_in_with_password(email, password).await?;

        // a failed lookup is handled like a missing record
        let record = self
            .directory
            .find_user(&session.user.id)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("Role lookup failed for {}: {}", session.user.id, e);
                None
            });

        let user = match record {
            Some(user) if user.is_admin() => user,
            Some(user) => {
                tracing::warn!("Rejected sign-in for non-admin {} ({})", user.email, user.role);
                self.revoke(&session.access_token).await;
                return Err(AppError::Forbidden(
                    "Access denied. Only administrators can access this panel.".to_string(),
                ));
            }
            None => {
                tracing::warn!("Rejected sign-in for unregistered account {}", session.user.id);
                self.revoke(&session.access_token).await;
                return Err(AppError::Forbidden(
                    "User not found in the system. Contact the administrator.".to_string(),
                ));
            }
        };

        tracing::info!("Admin {} signed in", user.email);

        Ok(AdminSession {
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            expires_in: session.expires_in,
            user,
        })
    }

    pub async fn sign_out(&self, access_token: &str) -> Result<()> {
        self.identity.sign_out(access_token).await
    }

    /// Provider account behind the token, if the session is still live
    pub async fn current_session(&self, access_token: &str) -> Result<Option<ProviderUser>> {
        self.identity.get_user(access_token).await
    }

    pub async fn verify_admin_role(&self, user_id: &str) -> Result<Option<AdminUser>> {
        self.directory.find_admin(user_id).await
    }

    /// Admin behind the token. Lookup failures count as "not an admin".
    pub async fn resolve_admin(&self, access_token: &str) -> Option<AdminUser> {
        let provider_user = match self.current_session(access_token).await {
            Ok(Some(user)) => user,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Session lookup failed: {}", e);
                return None;
            }
        };

        match self.verify_admin_role(&provider_user.id).await {
            Ok(admin) => admin,
            Err(e) => {
                tracing::warn!("Admin role check failed for {}: {}", provider_user.id, e);
                None
            }
        }
    }

    async fn revoke(&self, access_token: &str) {
        if let Err(e) = self.identity.sign_out(access_token).await {
            tracing::warn!("Failed to revoke rejected session: {}", e);
        }
    }
}
