//! HTTP surface of the SSE broadcast server.
//!
//! Exposes `GET /sse?channel=<name>` streaming `text/event-stream` frames, a health
//! check, the OpenAPI docs, and the routes contributed by enabled integrations.
use axum::http::{HeaderValue, Method};
use log::*;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};

pub use service::AppState;

mod controller;
pub mod error;
pub mod integrations;
mod router;
pub mod sse;

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let interface = app_state.config.interface().to_string();
    let port = app_state.config.port;

    let integrations = integrations::load(&app_state);
    let cors = cors_layer(&app_state.config.allowed_origins);
    let router = router::define_routes(app_state, integrations).layer(cors);

    let listener = TcpListener::bind(format!("{interface}:{port}")).await?;
    info!("Server starting... listening for connections on http://{interface}:{port}");

    axum::serve(listener, router).await
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin {origin}: {e}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_origin(AllowOrigin::list(origins))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use service::config::Config;

    pub(crate) fn memory_app_state() -> AppState {
        let config = Config::default().set_bus_url("memory://".to_string());
        let broadcaster =
            service::init_broadcaster(&config).expect("memory bus needs no connection");
        AppState::new(config, &broadcaster)
    }

    #[test]
    fn test_cors_layer_skips_invalid_origins() {
        let _layer = cors_layer(&[
            "http://localhost:3000".to_string(),
            "not\na header".to_string(),
        ]);
    }
}
