//! # Clientes Backend
//!
//! Customer records served over HTTP, persisted either in a local JSON file or
//! in a document store depending on the configured mode.
//!
//! ## Architecture
//!
//! The backend follows a layered architecture:
//! ```text
//! IO Layer (REST API, handlers)
//!     ↓
//! Domain Layer (validation, ClienteService)
//!     ↓
//! Storage Layer (JsonFileStore | DocumentStore)
//! ```
//!
//! The store is chosen once at startup and handed to every handler through
//! [`AppState`].

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use axum::{http::Method, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::AppConfig;
use crate::domain::ClienteService;

/// Main application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub cliente_service: ClienteService,
}

impl AppState {
    pub fn new(cliente_service: ClienteService) -> Self {
        Self { cliente_service }
    }
}

/// Select the store for this process and wire the services around it
pub async fn initialize_backend(config: &AppConfig) -> AppState {
    info!("Setting up storage (mode: {})", config.mode);
    let store = storage::select_store(config);

    let cliente_service = ClienteService::new(store);
    cliente_service.connect().await;

    info!("Setting up application state");
    AppState::new(cliente_service)
}

/// Cross-origin policy: any origin, no credentials
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(Any)
        .allow_credentials(false)
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            "/clientes",
            get(io::list_clientes)
                .post(io::create_cliente)
                .patch(io::update_clientes)
                .delete(io::delete_clientes),
        )
        .route("/clientes/search", get(io::find_cliente))
        .route(
            "/clientes/:id",
            get(io::get_cliente)
                .patch(io::update_cliente)
                .delete(io::delete_cliente),
        );

    Router::new()
        .route("/test", get(io::health_check))
        .nest("/api", api_routes)
        .layer(cors_layer())
        .with_state(app_state)
}
