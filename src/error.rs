//! Unified error type.

use std::net::AddrParseError;

use http::StatusCode;
use serde_json::json;

use crate::response::{IntoResponse, Response};

/// The error type returned by pagemeta's fallible operations.
///
/// Infrastructure failures (binding a port, accepting a connection) and
/// construction-time configuration mistakes surface here. The one
/// request-level variant, [`Error::InvalidParameter`], converts into a
/// `400 Bad Request` response so handlers and middleware can return it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid socket address: {0}")]
    Addr(#[from] AddrParseError),

    /// A pagination query parameter that is not a base-10 integer.
    #[error("invalid query parameter `{name}`: expected an integer, got `{value}`")]
    InvalidParameter { name: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Marks a response built from an [`Error`]. Response-phase middleware
/// leaves such responses as they are.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ErrorResponse;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let builder = Response::builder().extension(ErrorResponse);
        match self {
            Self::InvalidParameter { name, value } => builder
                .status(StatusCode::BAD_REQUEST)
                .json(json!({
                    "error": "invalid_parameter",
                    "parameter": name,
                    "value": value,
                })),
            _ => builder.status(StatusCode::INTERNAL_SERVER_ERROR).no_body(),
        }
    }
}
