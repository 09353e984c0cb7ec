use crate::core::error::Result;
use crate::features::auth::model::{AdminSession, AdminUser};
use crate::features::auth::services::AuthGateway;

/// Where a caller stands with respect to the admin area.
///
/// Starts in `Loading` and settles into `Admin` or `Anonymous` once the token
/// (if any) has been checked. Only `Admin` may see admin content.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Loading,
    Admin(AdminUser),
    Anonymous,
}

/// Session state owned by one consumer, moved along by gateway calls
#[derive(Debug, Clone)]
pub struct SessionContext {
    state: SessionState,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            state: SessionState::Loading,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn user(&self) -> Option<&AdminUser> {
        match &self.state {
            SessionState::Admin(user) => Some(user),
            _ => None,
        }
    }

    /// Leave `Loading` based on the presented token. Never fails: anything that
    /// is not a live admin session settles as `Anonymous`.
    pub async fn hydrate(&mut self, gateway: &AuthGateway, access_token: Option<&str>) -> &SessionState {
        self.state = match access_token {
            Some(token) if !token.is_empty() => match gateway.resolve_admin(token).await {
                Some(user) => SessionState::Admin(user),
                None => SessionState::Anonymous,
            },
            _ => SessionState::Anonymous,
        };

        &self.state
    }

    pub async fn sign_in(
        &mut self,
        gateway: &AuthGateway,
        email: &str,
        password: &str,
    ) -> Result<AdminSession> {
        match gateway.sign_in(email, password).await {
            Ok(session) => {
                self.state = SessionState::Admin(session.user.clone());
                Ok(session)
            }
            Err(e) => {
                self.state = SessionState::Anonymous;
                Err(e)
            }
        }
    }

    /// On failure the state is left as it was
    pub async fn sign_out(&mut self, gateway: &AuthGateway, access_token: &str) -> Result<()> {
        gateway.sign_out(access_token).await?;
        self.state = SessionState::Anonymous;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{admin_user, FakeIdentityProvider, InMemoryAdminDirectory};
    use std::sync::Arc;
    use tokio_test::{assert_err, assert_ok};

    const PASSWORD: &str = "s3cret-pass";

    fn setup(role: &str) -> (AuthGateway, AdminUser) {
        let user = admin_user(role);
        let identity = Arc::new(FakeIdentityProvider::with_account(&user, PASSWORD));
        let directory = Arc::new(InMemoryAdminDirectory::with(vec![user.clone()]));
        (AuthGateway::new(identity, directory), user)
    }

    #[tokio::test]
    async fn test_starts_loading() {
        let context = SessionContext::new();
        assert_eq!(context.state(), &SessionState::Loading);
        assert_eq!(context.user(), None);
    }

    #[tokio::test]
    async fn test_hydrate_without_token() {
        let (gateway, _) = setup("admin");
        let mut context = SessionContext::new();

        assert_eq!(context.hydrate(&gateway, None).await, &SessionState::Anonymous);
        assert_eq!(
            context.hydrate(&gateway, Some("")).await,
            &SessionState::Anonymous
        );
    }

    #[tokio::test]
    async fn test_hydrate_with_admin_token() {
        let (gateway, user) = setup("admin");
        let session = assert_ok!(gateway.sign_in(&user.email, PASSWORD).await);

        let mut context = SessionContext::new();
        context.hydrate(&gateway, Some(&session.access_token)).await;
        assert_eq!(context.user(), Some(&user));
    }

    #[tokio::test]
    async fn test_sign_in_and_out_transitions() {
        let (gateway, user) = setup("admin");
        let mut context = SessionContext::new();

        let session = assert_ok!(context.sign_in(&gateway, &user.email, PASSWORD).await);
        assert_eq!(context.user(), Some(&user));

        assert_ok!(context.sign_out(&gateway, &session.access_token).await);
        assert_eq!(context.state(), &SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_non_admin_sign_in_settles_anonymous() {
        let (gateway, user) = setup("viewer");
        let mut context = SessionContext::new();

        assert_err!(context.sign_in(&gateway, &user.email, PASSWORD).await);
        assert_eq!(context.state(), &SessionState::Anonymous);
    }
}
