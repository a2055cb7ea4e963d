//! Error handling for the gateway.

use odata_lang::{ParseError, ParseErrorKind};
use serde::Serialize;
use thiserror::Error;

/// Errors raised while serving a request.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The resource path or a query option failed to parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Compilation or execution failed.
    #[error(transparent)]
    Query(#[from] odata_core::Error),

    /// JSON encoding or fixture decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading a fixture failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A fixture document is not a valid schema or data set.
    #[error("invalid fixture: {0}")]
    Fixture(String),
}

impl GatewayError {
    /// HTTP status a transport should answer with.
    pub fn status(&self) -> u16 {
        use odata_core::Error as Core;

        match self {
            GatewayError::Parse(_) => 400,
            GatewayError::Query(err) => match err {
                Core::UnknownEntitySet { .. } | Core::EntityNotFound { .. } => 404,
                Core::UnknownProperty { .. } | Core::UnsupportedTraversalDepth { .. } => 400,
                Core::InvalidSchema(_) | Core::InvalidData(_) | Core::Protocol(_) => 500,
            },
            GatewayError::Json(_) | GatewayError::Io(_) | GatewayError::Fixture(_) => 500,
        }
    }

    /// Stable error code.
    pub fn code(&self) -> &'static str {
        use odata_core::Error as Core;

        match self {
            GatewayError::Parse(err) => err.kind.code(),
            GatewayError::Query(err) => match err {
                Core::UnknownEntitySet { .. } => "UnknownEntitySet",
                Core::EntityNotFound { .. } => "EntityNotFound",
                Core::UnknownProperty { .. } => "UnknownProperty",
                Core::UnsupportedTraversalDepth { .. } => {
                    ParseErrorKind::UnsupportedTraversalDepth.code()
                }
                Core::InvalidSchema(_) | Core::InvalidData(_) | Core::Protocol(_) => "InternalError",
            },
            GatewayError::Json(_) | GatewayError::Io(_) | GatewayError::Fixture(_) => "InternalError",
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error flag.
    pub error: bool,
    /// HTTP status.
    pub status: u16,
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
    /// Fix suggestion, for parse errors that carry one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl From<&GatewayError> for ErrorResponse {
    fn from(err: &GatewayError) -> Self {
        let hint = match err {
            GatewayError::Parse(parse) => parse.hint.clone(),
            _ => None,
        };

        ErrorResponse {
            error: true,
            status: err.status(),
            code: err.code().to_string(),
            message: err.to_string(),
            hint,
        }
    }
}
