//! HTTP client for sibling services that need to validate access tokens
//! against this service without sharing the signing secret.

use crate::application::auth::validate::TokenValidation;
use std::time::Duration;

/// Client for the internal validation endpoint.
///
/// Validation is fail-closed: any transport or decoding failure yields an
/// invalid verdict rather than an error, so callers can treat the result as
/// the final word on whether the request proceeds.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
}

impl AuthClient {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Validates an access token. Never fails: an unreachable auth service
    /// or a malformed response counts as an invalid token.
    pub async fn validate_token(&self, token: &str) -> TokenValidation {
        match self.request_validation(token).await {
            Ok(validation) => validation,
            Err(e) => {
                tracing::warn!("token validation request failed: {:?}", e);
                TokenValidation::invalid("Erreur lors de la validation du token")
            }
        }
    }

    async fn request_validation(&self, token: &str) -> anyhow::Result<TokenValidation> {
        let url = format!("{}/api/v1/internal/validate", self.base_url);

        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<TokenValidation>().await?)
    }

    /// Fetches a user by id from the internal directory endpoint.
    pub async fn get_user(&self, id: i64) -> anyhow::Result<Option<serde_json::Value>> {
        let url = format!("{}/api/v1/internal/users/{}", self.base_url, id);
        let response = self.http.get(url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        Ok(Some(response.error_for_status()?.json().await?))
    }

    /// Checks whether a user id exists.
    pub async fn user_exists(&self, id: i64) -> anyhow::Result<bool> {
        let url = format!("{}/api/v1/internal/users/{}/exists", self.base_url, id);
        let response = self.http.get(url).send().await?.error_for_status()?;

        Ok(response.json::<bool>().await?)
    }
}
