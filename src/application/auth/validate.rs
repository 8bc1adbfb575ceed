use crate::domain::auth::TokenCodec;
use crate::domain::users::{Role, UserRepository};
use crate::shared::error::AppError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Outcome of access-token validation. This type crosses the inter-service
/// boundary: it never carries an error, so calling services make one uniform
/// allow/deny decision.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TokenValidation {
    pub fn valid(user_id: i64, email: String, role: Role) -> Self {
        Self {
            valid: true,
            user_id: Some(user_id),
            email: Some(email),
            role: Some(role),
            message: None,
        }
    }

    pub fn invalid(message: &str) -> Self {
        Self {
            valid: false,
            user_id: None,
            email: None,
            role: None,
            message: Some(message.to_string()),
        }
    }
}

/// Verifies a bearer access token and re-confirms the live account state.
/// Access tokens cannot be revoked individually, so the directory re-check
/// is what makes disablement and locking take effect before expiry.
pub struct ValidateTokenUseCase {
    user_repo: Arc<dyn UserRepository>,
    token_codec: Arc<dyn TokenCodec>,
}

impl ValidateTokenUseCase {
    pub fn new(user_repo: Arc<dyn UserRepository>, token_codec: Arc<dyn TokenCodec>) -> Self {
        Self {
            user_repo,
            token_codec,
        }
    }

    /// Infallible: any internal failure degrades to the invalid form,
    /// never to an ambiguous success or an error.
    pub async fn execute(&self, token: &str) -> TokenValidation {
        match self.check(token).await {
            Ok(validation) => validation,
            Err(e) => {
                tracing::error!("token validation failed internally: {:?}", e);
                TokenValidation::invalid("Erreur lors de la validation du token")
            }
        }
    }

    async fn check(&self, token: &str) -> Result<TokenValidation, AppError> {
        // Empty token: no signature work, no directory read.
        if token.trim().is_empty() {
            return Ok(TokenValidation::invalid("Token manquant"));
        }

        let claims = match self.token_codec.verify(token) {
            Ok(claims) => claims,
            Err(reason) => {
                tracing::warn!(%reason, "access token rejected");
                return Ok(TokenValidation::invalid("Token invalide ou expiré"));
            }
        };

        let user = self
            .user_repo
            .find_by_id(claims.user_id)
            .await
            .map_err(AppError::InternalServerError)?;

        let Some(user) = user else {
            tracing::warn!(user_id = claims.user_id, "token for an unknown user");
            return Ok(TokenValidation::invalid("Utilisateur non trouvé"));
        };

        if !user.enabled {
            tracing::warn!(user_id = user.id, "token for a disabled account");
            return Ok(TokenValidation::invalid("Compte désactivé"));
        }
        if !user.account_non_locked {
            tracing::warn!(user_id = user.id, "token for a locked account");
            return Ok(TokenValidation::invalid("Compte verrouillé"));
        }

        Ok(TokenValidation::valid(user.id, user.email, user.role))
    }
}
