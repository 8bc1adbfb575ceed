use crate::application::auth::login::LoginRequest;
use crate::application::auth::refresh::RefreshTokenRequest;
use crate::application::auth::session::{AuthResponse, UserResponse};
use crate::application::auth::validate::TokenValidation;
use crate::domain::users::Role;
use crate::shared::error::{ErrorDetail, ErrorResponse};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Restobook Auth API",
        version = "0.1.0",
        description = "Service d'authentification de la plateforme Restobook.\n\nGère les sessions (JWT + refresh tokens rotatifs) et la validation de tokens pour les services internes.",
        contact(
            name = "API Support",
            email = "support@restobook.example"
        )
    ),
    paths(
        crate::presentation::handlers::auth::login,
        crate::presentation::handlers::auth::refresh_token,
        crate::presentation::handlers::auth::logout,
        crate::presentation::handlers::auth::logout_all,
        crate::presentation::handlers::internal::validate_token,
        crate::presentation::handlers::internal::get_user,
        crate::presentation::handlers::internal::get_user_by_email,
        crate::presentation::handlers::internal::user_exists,
        crate::presentation::handlers::admin::force_logout_all,
    ),
    components(
        schemas(
            LoginRequest,
            RefreshTokenRequest,
            AuthResponse,
            UserResponse,
            TokenValidation,
            Role,
            ErrorResponse,
            ErrorDetail,
        )
    ),
    tags(
        (name = "auth", description = "Session lifecycle endpoints"),
        (name = "internal", description = "Service-to-service endpoints"),
        (name = "admin", description = "Administrative session management")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
