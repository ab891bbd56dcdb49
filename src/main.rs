//! Schola Backend
//!
//! Content backend for a school website: posts, student performance, alumni
//! testimonials and site settings, persisted as JSON documents in SQLite.

mod api;
mod auth;
mod config;
mod db;
mod draft;
mod errors;
mod models;
mod notify;
mod performance;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth::SessionStore;
use config::{Config, LogFormat};
use db::{Repository, Store};
use draft::DraftService;
use notify::SettingsNotifier;

/// How often expired admin sessions are purged.
const SESSION_SWEEP_PERIOD: Duration = Duration::from_secs(60);

/// Buffered settings snapshots per subscriber.
const SETTINGS_CHANNEL_CAPACITY: usize = 16;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub sessions: SessionStore,
    pub draft: Arc<DraftService>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire up the services for a configuration over an open pool.
    pub fn new(config: Config, pool: sqlx::SqlitePool) -> Result<Self, errors::AppError> {
        let store = Store::new(pool, config.max_value_bytes);
        let repo = Repository::new(store, SettingsNotifier::new(SETTINGS_CHANNEL_CAPACITY));
        let draft = DraftService::from_config(&config)?;

        Ok(Self {
            repo: Arc::new(repo),
            sessions: SessionStore::new(config.session_timeout),
            draft: Arc::new(draft),
            config: Arc::new(config),
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let (json_layer, text_layer) = match config.log_format {
        LogFormat::Json => (Some(tracing_subscriber::fmt::layer().json()), None),
        LogFormat::Text => (None, Some(tracing_subscriber::fmt::layer())),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    tracing::info!("Starting Schola Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.gemini_api_key.is_none() {
        tracing::warn!("No SCHOLA_GEMINI_API_KEY configured. Post drafting is disabled.");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    if !Store::new(pool.clone(), config.max_value_bytes)
        .contains(db::keys::SETTINGS)
        .await?
    {
        tracing::info!("Fresh database, defaults will be seeded on first read");
    }

    let state = AppState::new(config, pool)?;
    let bind_addr = state.config.bind_addr;

    auth::spawn_session_sweeper(state.sessions.clone(), SESSION_SWEEP_PERIOD);

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

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

    let sessions = state.sessions.clone();

    // Public site routes
    let public_routes = Router::new()
        // Posts
        .route("/posts", get(api::list_posts))
        .route("/posts/{id}", get(api::get_post))
        // Performance
        .route("/performance", get(api::list_performance))
        .route("/performance/view", get(api::performance_view))
        // Testimonials
        .route("/testimonials", get(api::list_testimonials))
        .route("/testimonials", post(api::submit_testimonial))
        .route("/alumni/identify", post(api::identify_alumni))
        // Settings
        .route("/settings", get(api::get_settings))
        .route("/settings/events", get(api::settings_events))
        // Login
        .route("/admin/login", post(api::login));

    // Admin routes
    let admin_routes = Router::new()
        .route("/logout", post(api::logout))
        .route("/session", get(api::session_status))
        // Posts
        .route("/posts", post(api::create_post))
        .route("/posts/{id}", put(api::update_post))
        .route("/posts/{id}", delete(api::delete_post))
        // Performance
        .route("/performance", post(api::create_performance))
        .route("/performance/import", post(api::import_performance))
        .route("/performance/{id}", put(api::update_performance))
        .route("/performance/{id}", delete(api::delete_performance))
        // Testimonials
        .route("/testimonials/{id}", put(api::update_testimonial))
        .route("/testimonials/{id}", delete(api::delete_testimonial))
        // Settings
        .route("/settings", put(api::save_settings))
        .route("/settings/hero-images", post(api::add_hero_image))
        .route("/settings/hero-images/{index}", delete(api::remove_hero_image))
        // Credentials
        .route("/credentials", get(api::get_credentials))
        .route("/credentials", put(api::save_credentials))
        // Drafting
        .route("/draft/status", get(api::draft_status))
        .route("/draft", post(api::draft_post))
        // Apply session auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::session_auth_layer(sessions.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", public_routes.nest("/admin", admin_routes))
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
