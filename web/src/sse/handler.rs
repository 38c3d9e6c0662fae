use crate::error::Result;
use crate::AppState;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use log::*;
use serde::Deserialize;
use sse::DEFAULT_CHANNEL;
use utoipa::IntoParams;

pub const EVENT_STREAM_CONTENT_TYPE: &str = "text/event-stream";

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ChannelParams {
    /// Channel to stream events from, `sse` when omitted.
    pub channel: Option<String>,
}

/// GET a live stream of server-sent events published to a channel
#[utoipa::path(
    get,
    path = "/sse",
    params(ChannelParams),
    responses(
        (status = 200, description = "Stream of SSE frames, open until the client disconnects", content_type = "text/event-stream", body = String),
        (status = 502, description = "The message bus could not be reached"),
    )
)]
pub async fn sse_handler(
    State(app_state): State<AppState>,
    Query(params): Query<ChannelParams>,
) -> Result<Response> {
    let channel = params
        .channel
        .unwrap_or_else(|| DEFAULT_CHANNEL.to_string());

    stream_channel(&app_state, &channel).await
}

/// Subscribes to `channel` and streams its frames as the response body.
///
/// The subscription lives exactly as long as the response body: when the client goes
/// away the body is dropped, which closes the bus connection.
pub(crate) async fn stream_channel(app_state: &AppState, channel: &str) -> Result<Response> {
    debug!("Establishing SSE stream for channel {channel}");

    let frames = app_state.broadcaster.messages(channel).await?;

    Ok((
        [
            (header::CONTENT_TYPE, EVENT_STREAM_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(frames),
    )
        .into_response())
}
