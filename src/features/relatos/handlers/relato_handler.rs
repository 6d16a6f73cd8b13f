use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::{ErrorBody, Result};
use crate::core::extractor::AppJson;
use crate::features::relatos::dtos::{
    CreateRelatoDto, CreateRelatoResponseDto, RelatoResponseDto, TestStatusDto,
};
use crate::features::relatos::services::RelatoService;

/// State for relato handlers
#[derive(Clone)]
pub struct RelatoState {
    pub relato_service: Arc<RelatoService>,
}

/// Submit a new relato with optional photos
#[utoipa::path(
    post,
    path = "/relatos",
    request_body = CreateRelatoDto,
    responses(
        (status = 200, description = "Relato created", body = CreateRelatoResponseDto),
        (status = 400, description = "Malformed image payload", body = ErrorBody),
        (status = 500, description = "Storage or database failure", body = ErrorBody)
    ),
    tag = "relatos"
)]
pub async fn create_relato(
    State(state): State<RelatoState>,
    AppJson(dto): AppJson<CreateRelatoDto>,
) -> Result<Json<CreateRelatoResponseDto>> {
    tracing::info!("Receiving new relato: {}", dto.titulo);

    let id = state.relato_service.create(dto.into()).await?;

    Ok(Json(CreateRelatoResponseDto {
        mensagem: "Relato recebido com sucesso.".to_string(),
        id,
    }))
}

/// List the 4 most recent relatos, newest first
#[utoipa::path(
    get,
    path = "/relatos",
    responses(
        (status = 200, description = "Most recent relatos", body = Vec<RelatoResponseDto>),
        (status = 500, description = "Database failure", body = ErrorBody)
    ),
    tag = "relatos"
)]
pub async fn list_relatos(
    State(state): State<RelatoState>,
) -> Result<Json<Vec<RelatoResponseDto>>> {
    let relatos = state.relato_service.list_recent().await?;
    tracing::info!("Found {} relatos", relatos.len());

    let dtos: Vec<RelatoResponseDto> = relatos.into_iter().map(|r| r.into()).collect();
    Ok(Json(dtos))
}

/// Liveness probe with a fixed status payload
#[utoipa::path(
    get,
    path = "/test",
    responses(
        (status = 200, description = "API is alive", body = TestStatusDto)
    ),
    tag = "probes"
)]
pub async fn test_endpoint() -> Json<TestStatusDto> {
    tracing::info!("Test endpoint called");
    Json(TestStatusDto {
        status: "ok".to_string(),
        message: "API is working".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Router};
    use axum_test::TestServer;

    #[tokio::test]
    async fn test_endpoint_returns_fixed_payload() {
        let app = Router::new().route("/test", get(test_endpoint));
        let server = TestServer::new(app).unwrap();

        let response = server.get("/test").await;
        response.assert_status_ok();

        let body: TestStatusDto = response.json();
        assert_eq!(body.status, "ok");
        assert_eq!(body.message, "API is working");
    }
}
