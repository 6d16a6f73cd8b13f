use utoipa::{Modify, OpenApi};

use crate::core::error::ErrorBody;
use crate::features::relatos::dtos::{
    CreateRelatoDto, CreateRelatoResponseDto, RelatoResponseDto, TestStatusDto,
};
use crate::features::relatos::handlers;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::create_relato,
        handlers::list_relatos,
        handlers::test_endpoint,
    ),
    components(schemas(
        CreateRelatoDto,
        CreateRelatoResponseDto,
        RelatoResponseDto,
        TestStatusDto,
        ErrorBody,
    )),
    tags(
        (name = "relatos", description = "Citizen report submission and listing"),
        (name = "probes", description = "Liveness probes"),
    ),
    info(
        title = "Urbanfy API",
        version = "0.1.0",
        description = "API documentation for Urbanfy",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
