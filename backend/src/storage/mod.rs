//! # Storage Module
//!
//! Handles persistence of clientes.
//!
//! Two interchangeable backends implement [`ClienteStorage`]:
//!
//! - **JsonFileStore**: a single JSON document on the local filesystem,
//!   rewritten on every change. Used unless the process runs `online`.
//! - **DocumentStore**: the `Clientes` collection of a schema-declaring
//!   database reached through sqlx.
//!
//! [`select_store`] picks one of them from the configuration at startup.

pub mod document_store;
pub mod error;
pub mod json_file_store;
pub mod selector;
pub mod traits;

#[cfg(test)]
pub mod test_utils;

pub use document_store::DocumentStore;
pub use error::{StoreError, StoreResult};
pub use json_file_store::JsonFileStore;
pub use selector::select_store;
pub use traits::ClienteStorage;
