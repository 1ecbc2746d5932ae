//! # chapel_api
//!
//! HTTP API library for Chapel.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, patch, post, put};
use chapel_core::auth::service::Authenticator;
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::config::ApiConfig;
use crate::handlers::{admin, auth, health, public};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool.
    pub pool: PgPool,
    /// Token issuer and verifier backed by the credential store.
    pub auth: Authenticator,
    /// API configuration.
    pub config: ApiConfig,
}

/// Run embedded database migrations.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    chapel_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    // Public routes (no auth required)
    let public = Router::new()
        .route(routes::GET_HEALTH, get(health::health_handler))
        .route(routes::POST_ADMIN_LOGIN, post(auth::login_handler))
        .route(routes::GET_ANNOUNCEMENTS, get(public::announcements_handler))
        .route(routes::GET_EVENTS, get(public::events_handler))
        .route(routes::GET_EVENT_ID, get(public::event_handler))
        .route(routes::GET_EVENT_GALLERY, get(public::event_gallery_handler))
        .route(routes::GET_MEDIA, get(public::media_handler))
        .route(routes::GET_CHURCH_INFO, get(public::church_info_handler))
        .route(routes::POST_CONTACT, post(public::contact_handler));

    // Admin routes (require a valid bearer token)
    let protected = Router::new()
        .route(routes::GET_ADMIN_ME, get(auth::me_handler))
        .route(
            routes::ADMIN_RESOURCE,
            get(admin::list_handler).post(admin::create_handler),
        )
        .route(
            routes::ADMIN_RESOURCE_ID,
            put(admin::update_handler).delete(admin::delete_handler),
        )
        .route(
            routes::PATCH_ADMIN_CONTACT_READ,
            patch(admin::mark_read_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_admin,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}
