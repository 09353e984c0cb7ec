use async_trait::async_trait;
use serde::Serialize;

use crate::core::config::IdentityConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::{ProviderSession, ProviderUser};

/// Hosted identity provider: password sign-in and session lookup
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Fails with `Unauthorized` on bad credentials
    async fn sign_in_with_password(&self, email: &str, password: &str)
        -> Result<ProviderSession>;

    /// `None` when the token is expired, revoked or unknown
    async fn get_user(&self, access_token: &str) -> Result<Option<ProviderUser>>;

    async fn sign_out(&self, access_token: &str) -> Result<()>;
}

#[derive(Debug, Serialize)]
struct PasswordGrantRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Client for a GoTrue-compatible auth REST API
pub struct IdentityClient {
    http_client: reqwest::Client,
    config: IdentityConfig,
}

impl IdentityClient {
    pub fn new(config: IdentityConfig) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.auth_url, path)
    }
}

#[async_trait]
impl IdentityProvider for IdentityClient {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderSession> {
        let url = self.url("/token?grant_type=password");

        tracing::debug!("Password sign-in for {}", email);

        let response = self
            .http_client
            .post(&url)
            .header("apikey", &self.config.api_key)
            .json(&PasswordGrantRequest { email, password })
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach identity provider: {}", e);
                AppError::ExternalServiceError(format!("Failed to reach identity provider: {}", e))
            })?;

        let status = response.status();

        if status.is_success() {
            return response.json::<ProviderSession>().await.map_err(|e| {
                tracing::error!("Failed to parse sign-in response: {}", e);
                AppError::ExternalServiceError(format!("Failed to parse sign-in response: {}", e))
            });
        }

        let body = response.text().await.unwrap_or_default();

        // GoTrue answers bad credentials with 400 invalid_grant
        if matches!(status.as_u16(), 400 | 401 | 422) {
            tracing::info!("Sign-in rejected for {}: HTTP {}", email, status);
            return Err(AppError::Unauthorized(
                "Invalid credentials. Check your email and password.".to_string(),
            ));
        }

        tracing::error!("Identity provider error: HTTP {} - {}", status, body);
        Err(AppError::ExternalServiceError(format!(
            "Identity provider error: HTTP {}",
            status
        )))
    }

    async fn get_user(&self, access_token: &str) -> Result<Option<ProviderUser>> {
        let response = self
            .http_client
            .get(self.url("/user"))
            .header("apikey", &self.config.api_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach identity provider: {}", e);
                AppError::ExternalServiceError(format!("Failed to reach identity provider: {}", e))
            })?;

        let status = response.status();

        if matches!(status.as_u16(), 401 | 403 | 404) {
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Identity provider error: HTTP {} - {}", status, body);
            return Err(AppError::ExternalServiceError(format!(
                "Identity provider error: HTTP {}",
                status
            )));
        }

        let user = response.json::<ProviderUser>().await.map_err(|e| {
            tracing::error!("Failed to parse user response: {}", e);
            AppError::ExternalServiceError(format!("Failed to parse user response: {}", e))
        })?;

        Ok(Some(user))
    }

    async fn sign_out(&self, access_token: &str) -> Result<()> {
        let response = self
            .http_client
            .post(self.url("/logout"))
            .header("apikey", &self.config.api_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach identity provider: {}", e);
                AppError::ExternalServiceError("Error signing out.".to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Sign-out rejected: HTTP {} - {}", status, body);
            return Err(AppError::ExternalServiceError(
                "Error signing out.".to_string(),
            ));
        }

        Ok(())
    }
}
