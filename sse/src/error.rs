//! Error types for the `sse` crate.
//!
//! Follows the same layout as the other crates in the workspace: a root `Error` struct
//! holding an `error_kind` tree and the optional `source` that caused it. Callers match on
//! `error_kind` to decide how to surface a failure (e.g. `web` maps kinds to status codes).
use std::error::Error as StdError;
use std::fmt;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

/// Major categories of errors raised by the broadcast core.
#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    /// A message or envelope without a payload, or an envelope that is not valid JSON.
    InvalidMessage(String),
    /// The bus could not be reached or rejected a command.
    Transport,
    /// A subscription's bus connection has ended.
    ConnectionClosed,
    Integration(IntegrationErrorKind),
}

/// Failures raised while wiring integrations at startup.
#[derive(Debug, PartialEq)]
pub enum IntegrationErrorKind {
    /// The integration needs something that is not available in this build or deployment.
    MissingDependency(String),
    /// An integration with the same id is already registered.
    Duplicate(String),
}

impl Error {
    pub fn invalid_message(reason: impl Into<String>) -> Self {
        Error {
            source: None,
            error_kind: ErrorKind::InvalidMessage(reason.into()),
        }
    }

    pub fn connection_closed() -> Self {
        Error {
            source: None,
            error_kind: ErrorKind::ConnectionClosed,
        }
    }

    pub fn missing_dependency(reason: impl Into<String>) -> Self {
        Error {
            source: None,
            error_kind: ErrorKind::Integration(IntegrationErrorKind::MissingDependency(
                reason.into(),
            )),
        }
    }

    pub fn duplicate_integration(id: impl Into<String>) -> Self {
        Error {
            source: None,
            error_kind: ErrorKind::Integration(IntegrationErrorKind::Duplicate(id.into())),
        }
    }

    pub fn is_connection_closed(&self) -> bool {
        self.error_kind == ErrorKind::ConnectionClosed
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            ErrorKind::InvalidMessage(reason) => write!(f, "Invalid message: {reason}"),
            ErrorKind::Transport => match &self.source {
                Some(source) => write!(f, "Bus transport error: {source}"),
                None => write!(f, "Bus transport error"),
            },
            ErrorKind::ConnectionClosed => write!(f, "Bus connection closed"),
            ErrorKind::Integration(IntegrationErrorKind::MissingDependency(reason)) => {
                write!(f, "Missing integration dependency: {reason}")
            }
            ErrorKind::Integration(IntegrationErrorKind::Duplicate(id)) => {
                write!(f, "Integration already registered: {id}")
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: ErrorKind::Transport,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            error_kind: ErrorKind::InvalidMessage(err.to_string()),
            source: Some(Box::new(err)),
        }
    }
}
