use axum::response::IntoResponse;

/// Confirmation text returned by the health route
pub const HEALTH_MESSAGE: &str = "Api Funcionando OK";

/// GET /test
pub async fn health_check() -> impl IntoResponse {
    HEALTH_MESSAGE
}
