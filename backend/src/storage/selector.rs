use std::sync::Arc;

use tracing::info;

use super::document_store::DocumentStore;
use super::json_file_store::JsonFileStore;
use super::traits::ClienteStorage;
use crate::config::{AppConfig, PersistenceMode};

/// Pick the cliente store for this process.
///
/// Called once at startup; the returned handle is shared by every request.
/// The document store is only chosen in `online` mode, anything else persists
/// to the local JSON file.
pub fn select_store(config: &AppConfig) -> Arc<dyn ClienteStorage> {
    let store: Arc<dyn ClienteStorage> = match config.mode {
        PersistenceMode::Online => Arc::new(DocumentStore::new(config.database_url.clone())),
        PersistenceMode::Local => Arc::new(JsonFileStore::new(&config.json_path)),
    };

    info!("Persisting Clientes in: {}", store.backend_name());
    store
}
