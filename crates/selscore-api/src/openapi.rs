//! OpenAPI/Swagger shell for the SEL inference API.
//!
//! Mirrors the teacher's minimal setup: a tagged `ApiDoc` plus a server
//! info `Modify` pass, served at `/api-docs`. Routes are plain `axum`
//! handlers (see `handlers/`), not individually annotated.

use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

#[derive(Default)]
struct ServerModifier;

impl Modify for ServerModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = "SelScore API".to_string();
        openapi.info.version = env!("CARGO_PKG_VERSION").to_string();
        openapi.info.description = Some(
            "Social-emotional skill inference for K-12 students.\n\n\
             Combines ML prediction, multi-source evidence fusion, and LLM-or-template \
             rationale generation, exposed over JSON/HTTP."
                .to_string(),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&ServerModifier),
    tags(
        (name = "inference", description = "Per-student skill assessment and batch dispatch"),
        (name = "fusion", description = "Evidence fusion weight configuration"),
        (name = "metrics", description = "Operation metrics"),
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/api-docs{/spec}").url("/api/openapi.json", ApiDoc::openapi())
}
