use crate::presentation::handlers;
use crate::presentation::middleware::{cors, rate_limit};
use crate::presentation::openapi::ApiDoc;
use crate::presentation::routes;
use axum::{Router, routing::get};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::infrastructure::state::AppState;

pub fn app(state: AppState) -> anyhow::Result<Router> {
    // Only login and refresh are reachable without a valid token, so the
    // rate limit sits on the auth routes rather than the whole router.
    let auth_routes = routes::auth::routes().layer(rate_limit::rate_limit_layer()?);

    Ok(Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(handlers::health::health_check))
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/internal", routes::internal::routes())
        .nest("/api/v1/admin", routes::admin::routes())
        .layer(cors::cors_layer()?)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
