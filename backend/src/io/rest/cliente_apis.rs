//! # REST API for Cliente Management
//!
//! Endpoints for creating, searching, updating and deleting clientes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use shared::{ClienteQuery, ClienteUpdate, CountResponse, NewCliente, UpdateManyRequest};
use tracing::info;

use super::error_response;
use crate::AppState;

/// List clientes, optionally filtered by query-string fields
pub async fn list_clientes(
    State(state): State<AppState>,
    Query(query): Query<ClienteQuery>,
) -> impl IntoResponse {
    info!("GET /api/clientes - query: {:?}", query);

    match state.cliente_service.list_clientes(&query).await {
        Ok(clientes) => (StatusCode::OK, Json(clientes)).into_response(),
        Err(e) => error_response("listing clientes", e),
    }
}

/// Create a new cliente
pub async fn create_cliente(
    State(state): State<AppState>,
    Json(request): Json<NewCliente>,
) -> impl IntoResponse {
    info!("POST /api/clientes - request: {:?}", request);

    match state.cliente_service.create_cliente(request).await {
        Ok(cliente) => (StatusCode::CREATED, Json(cliente)).into_response(),
        Err(e) => error_response("creating cliente", e),
    }
}

/// First cliente matching the query-string fields
pub async fn find_cliente(
    State(state): State<AppState>,
    Query(query): Query<ClienteQuery>,
) -> impl IntoResponse {
    info!("GET /api/clientes/search - query: {:?}", query);

    match state.cliente_service.find_cliente(&query).await {
        Ok(Some(cliente)) => (StatusCode::OK, Json(cliente)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Cliente not found").into_response(),
        Err(e) => error_response("searching cliente", e),
    }
}

/// Apply one update to every matching cliente
pub async fn update_clientes(
    State(state): State<AppState>,
    Json(request): Json<UpdateManyRequest>,
) -> impl IntoResponse {
    info!("PATCH /api/clientes - request: {:?}", request);

    match state
        .cliente_service
        .update_clientes(&request.query, &request.update)
        .await
    {
        Ok(count) => (StatusCode::OK, Json(CountResponse { count })).into_response(),
        Err(e) => error_response("updating clientes", e),
    }
}

/// Delete every cliente matching the query-string fields
pub async fn delete_clientes(
    State(state): State<AppState>,
    Query(query): Query<ClienteQuery>,
) -> impl IntoResponse {
    info!("DELETE /api/clientes - query: {:?}", query);

    match state.cliente_service.delete_clientes(&query).await {
        Ok(count) => (StatusCode::OK, Json(CountResponse { count })).into_response(),
        Err(e) => error_response("deleting clientes", e),
    }
}

/// Get a cliente by ID
pub async fn get_cliente(
    State(state): State<AppState>,
    Path(cliente_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/clientes/{}", cliente_id);

    match state.cliente_service.get_cliente(&cliente_id).await {
        Ok(cliente) => (StatusCode::OK, Json(cliente)).into_response(),
        Err(e) => error_response("getting cliente", e),
    }
}

/// Update a cliente by ID
pub async fn update_cliente(
    State(state): State<AppState>,
    Path(cliente_id): Path<String>,
    Json(request): Json<ClienteUpdate>,
) -> impl IntoResponse {
    info!("PATCH /api/clientes/{} - request: {:?}", cliente_id, request);

    match state.cliente_service.update_cliente(&cliente_id, &request).await {
        Ok(Some(cliente)) => (StatusCode::OK, Json(cliente)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Cliente not found").into_response(),
        Err(e) => error_response("updating cliente", e),
    }
}

/// Delete a cliente by ID
pub async fn delete_cliente(
    State(state): State<AppState>,
    Path(cliente_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/clientes/{}", cliente_id);

    match state.cliente_service.delete_cliente(&cliente_id).await {
        Ok(Some(cliente)) => (StatusCode::OK, Json(cliente)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Cliente not found").into_response(),
        Err(e) => error_response("deleting cliente", e),
    }
}
