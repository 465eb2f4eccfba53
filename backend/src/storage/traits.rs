//! # Storage Traits
//!
//! This module defines the storage abstraction that lets the JSON file and the
//! document store be used interchangeably by the domain layer.

use async_trait::async_trait;
use shared::{Cliente, ClienteQuery, ClienteUpdate, NewCliente};

use super::error::StoreResult;

/// Trait defining the interface for cliente storage operations
///
/// Both backends honour the same pre and post conditions, except where noted:
/// the document store fails `update_one` with `NotFound` instead of returning
/// `None`, and it does not provide `delete_many`.
#[async_trait]
pub trait ClienteStorage: Send + Sync {
    /// Short label of the medium, used in logs
    fn backend_name(&self) -> &'static str;

    /// Establish the underlying connection ahead of the first request
    async fn connect(&self) -> StoreResult<()> {
        Ok(())
    }

    /// Release the underlying connection
    async fn disconnect(&self) {}

    /// Store a new cliente, assigning an id when none is given
    async fn create(&self, data: NewCliente) -> StoreResult<Cliente>;

    /// First cliente matching the query
    async fn read_one(&self, query: &ClienteQuery) -> StoreResult<Option<Cliente>>;

    /// Every cliente matching the query, in storage order
    async fn read_many(&self, query: &ClienteQuery) -> StoreResult<Vec<Cliente>>;

    /// Merge `data` into the first match and return the merged record
    async fn update_one(
        &self,
        query: &ClienteQuery,
        data: &ClienteUpdate,
    ) -> StoreResult<Option<Cliente>>;

    /// Merge `data` into every match
    /// Returns the number of matching clientes
    async fn update_many(&self, query: &ClienteQuery, data: &ClienteUpdate) -> StoreResult<u64>;

    /// Remove the first match and return it
    async fn delete_one(&self, query: &ClienteQuery) -> StoreResult<Option<Cliente>>;

    /// Remove every match
    /// Returns the number of clientes actually deleted
    async fn delete_many(&self, query: &ClienteQuery) -> StoreResult<u64>;

    async fn read_all(&self) -> StoreResult<Vec<Cliente>>;

    /// Cliente with the given id, or `StoreError::NotFound`
    async fn read_by_id(&self, id: &str) -> StoreResult<Cliente>;
}
