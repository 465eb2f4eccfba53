use std::sync::Arc;

use shared::{Cliente, ClienteQuery, ClienteUpdate, NewCliente};
use tracing::{error, info, warn};

use crate::storage::{ClienteStorage, StoreError, StoreResult};

/// Service for managing clientes on top of whichever store was selected
#[derive(Clone)]
pub struct ClienteService {
    store: Arc<dyn ClienteStorage>,
}

impl ClienteService {
    pub fn new(store: Arc<dyn ClienteStorage>) -> Self {
        Self { store }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Connect the store ahead of the first request.
    ///
    /// A failure is only logged: the store tries again on its next use.
    pub async fn connect(&self) {
        match self.store.connect().await {
            Ok(()) => info!("Store ready: {}", self.store.backend_name()),
            Err(e) => error!("Error connecting to the {}: {}", self.store.backend_name(), e),
        }
    }

    pub async fn disconnect(&self) {
        self.store.disconnect().await;
    }

    pub async fn create_cliente(&self, data: NewCliente) -> StoreResult<Cliente> {
        info!("Creating cliente: dni={:?}", data.dni);
        self.store.create(data).await
    }

    pub async fn get_cliente(&self, id: &str) -> StoreResult<Cliente> {
        let result = self.store.read_by_id(id).await;
        if let Err(StoreError::NotFound) = &result {
            warn!("Cliente not found: {}", id);
        }
        result
    }

    pub async fn find_cliente(&self, query: &ClienteQuery) -> StoreResult<Option<Cliente>> {
        self.store.read_one(query).await
    }

    /// List clientes matching the query; the empty query lists everything
    pub async fn list_clientes(&self, query: &ClienteQuery) -> StoreResult<Vec<Cliente>> {
        let clientes = if query.is_empty() {
            self.store.read_all().await?
        } else {
            self.store.read_many(query).await?
        };

        info!("Found {} clientes", clientes.len());
        Ok(clientes)
    }

    /// Update the cliente with the given id
    pub async fn update_cliente(&self, id: &str, data: &ClienteUpdate) -> StoreResult<Option<Cliente>> {
        info!("Updating cliente: {}", id);
        self.store.update_one(&ClienteQuery::by_id(id), data).await
    }

    pub async fn update_clientes(&self, query: &ClienteQuery, data: &ClienteUpdate) -> StoreResult<u64> {
        self.store.update_many(query, data).await
    }

    pub async fn delete_cliente(&self, id: &str) -> StoreResult<Option<Cliente>> {
        info!("Deleting cliente: {}", id);
        self.store.delete_one(&ClienteQuery::by_id(id)).await
    }

    pub async fn delete_clientes(&self, query: &ClienteQuery) -> StoreResult<u64> {
        self.store.delete_many(query).await
    }
}
