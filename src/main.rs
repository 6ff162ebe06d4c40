//! Community Events Portal
//!
//! Serves event registration forms to visitors and the form builder,
//! registration review and CSV export to administrators, on top of the
//! community events REST service.

mod api;
mod auth;
mod backend;
mod bus;
mod config;
mod errors;
mod models;
mod registration;
mod session;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use backend::{HttpBackend, RegistrationBackend};
use bus::EventBus;
use config::Config;
use registration::DraftStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn RegistrationBackend>,
    pub drafts: Arc<DraftStore>,
    pub bus: EventBus,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Community Events Portal");
    tracing::info!("Events service: {}", config.upstream_url);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if the admin key is not configured
    if config.admin_psk.is_none() {
        tracing::warn!("No admin key configured (PORTAL_ADMIN_PSK). Admin routes are open!");
    }

    let backend = Arc::new(HttpBackend::new(&config.upstream_url)?);

    let event_bus = EventBus::new();
    tokio::spawn(bus::log_events(event_bus.subscribe()));

    // Create application state
    let state = AppState {
        backend,
        drafts: Arc::new(DraftStore::new()),
        bus: event_bus,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone the admin key for the auth layer
    let psk = state.config.admin_psk.clone();

    // Form builder and registration review
    let admin_routes = Router::new()
        .route(
            "/events/{id}/form",
            post(api::open_form_draft)
                .get(api::get_form_draft)
                .delete(api::cancel_form_draft),
        )
        .route("/events/{id}/form/fields", post(api::add_field))
        .route(
            "/events/{id}/form/fields/{field_id}",
            patch(api::update_field).delete(api::remove_field),
        )
        .route(
            "/events/{id}/form/fields/{field_id}/options",
            post(api::add_option),
        )
        .route(
            "/events/{id}/form/fields/{field_id}/options/{index}",
            put(api::update_option),
        )
        .route("/events/{id}/form/move", post(api::move_field))
        .route("/events/{id}/form/settings", put(api::update_form_settings))
        .route("/events/{id}/form/save", post(api::save_form_draft))
        .route("/events/{id}/registrations", get(api::list_registrations))
        .route(
            "/events/{id}/registrations/export",
            get(api::export_registrations),
        )
        // Apply admin key middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::admin_psk_layer(psk.clone(), req, next)
        }));

    // Public registration (no admin key required)
    let public_routes = Router::new().route(
        "/api/register/{slug}",
        get(api::get_registration_form).post(api::submit_registration),
    );

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api/admin", admin_routes)
        .merge(public_routes)
        .merge(health_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
