//! # IO Module
//!
//! Interface layer exposing the domain services to the outside world.
//! Currently only the REST API.

pub mod rest;

pub use rest::cliente_apis::*;
pub use rest::health_apis::*;
