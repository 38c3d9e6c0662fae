use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::*;

use sse::error::{Error as SseError, ErrorKind};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(SseError);

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.0)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{}", self.0)
    }
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html#associatedconstant.UNPROCESSABLE_ENTITY
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        error!("SSE request failed: {}", self.0);

        match self.0.error_kind {
            ErrorKind::Transport => (StatusCode::BAD_GATEWAY, "BAD GATEWAY").into_response(),
            ErrorKind::InvalidMessage(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "UNPROCESSABLE ENTITY").into_response()
            }
            ErrorKind::ConnectionClosed => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE UNAVAILABLE").into_response()
            }
            ErrorKind::Integration(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
            }
        }
    }
}

impl<E> From<E> for Error
where
    E: Into<SseError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: SseError) -> StatusCode {
        Error::from(err).into_response().status()
    }

    #[test]
    fn test_status_codes() {
        let transport = SseError {
            source: None,
            error_kind: ErrorKind::Transport,
        };
        assert_eq!(status_of(transport), StatusCode::BAD_GATEWAY);
        assert_eq!(
            status_of(SseError::invalid_message("no data")),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(SseError::connection_closed()),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(SseError::missing_dependency("deposit")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
