//! Per-deposit event streams.
//!
//! Every deposit gets its own channel, named after the route that streams it, so a
//! publisher only needs the deposit's pid value to reach everybody watching it.
use crate::AppState;
use axum::Router;

pub const ID: &str = "deposit";

/// Route streaming the channel of one deposit.
pub const ROUTE: &str = "/deposits/:pid_value/sse";

/// Channel carrying the events of deposit `pid_value`.
pub fn channel(pid_value: &str) -> String {
    format!("/deposits/{pid_value}/sse")
}

#[cfg(feature = "deposit")]
pub fn init(app_state: &AppState) -> sse::error::Result<Router> {
    use axum::routing::get;

    Ok(Router::new()
        .route(ROUTE, get(handler::deposit_sse))
        .with_state(app_state.clone()))
}

#[cfg(not(feature = "deposit"))]
pub fn init(_app_state: &AppState) -> sse::error::Result<Router> {
    Err(sse::Error::missing_dependency(
        "the deposit SSE integration requires the `deposit` feature of the `web` crate",
    ))
}

#[cfg(feature = "deposit")]
mod handler {
    use super::channel;
    use crate::error::Result;
    use crate::sse::handler::stream_channel;
    use crate::AppState;
    use axum::extract::{Path, State};
    use axum::response::Response;

    pub(super) async fn deposit_sse(
        State(app_state): State<AppState>,
        Path(pid_value): Path<String>,
    ) -> Result<Response> {
        stream_channel(&app_state, &channel(&pid_value)).await
    }
}
