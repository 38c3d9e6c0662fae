use crate::{controller::health_check_controller, sse::handler, AppState};
use axum::{routing::get, Router};
use sse::integration::Registry;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "SSE Broadcast API"
        ),
        paths(
            health_check_controller::health_check,
            handler::sse_handler,
        ),
        tags(
            (name = "sse_broadcast", description = "Server-sent events streamed from named channels")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState, integrations: Registry<Router>) -> Router {
    integrations
        .into_integrations()
        .fold(
            Router::new()
                .merge(health_routes())
                .merge(sse_routes(app_state)),
            |router, (_id, integration)| router.merge(integration),
        )
        .merge(RapiDoc::with_openapi("/api-docs/openapi2.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn sse_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/sse", get(handler::sse_handler))
        .with_state(app_state)
}
