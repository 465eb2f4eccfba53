//! # Domain Module
//!
//! Business rules for clientes, independent of the HTTP layer and of the
//! storage medium.
//!
//! - **validation**: builds a complete record from creation input and enforces
//!   required fields, the mail pattern and uniqueness
//! - **cliente_service**: the operations the REST layer calls, delegated to
//!   the selected store

pub mod cliente_service;
pub mod validation;

pub use cliente_service::ClienteService;
pub use validation::ValidationError;
