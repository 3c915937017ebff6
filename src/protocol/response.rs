//! Response definitions
//!
//! Represents the single line sent back to a client.

use crate::error::{token, JsontabError};

/// Success word for commands without a payload
pub const OK: &str = "OK!";

/// A response to send to client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Command succeeded without a payload
    Ok,

    /// Command produced a payload (JSON text or a bare key)
    Value(String),

    /// Command failed; carries the wire token
    Error(String),
}

impl Response {
    /// Create a payload response
    pub fn value(payload: impl Into<String>) -> Self {
        Response::Value(payload.into())
    }

    /// Create the response for a failed command
    pub fn from_error(error: &JsontabError) -> Self {
        Response::Error(error.wire_token().to_string())
    }

    /// Create a generic ERROR response
    pub fn error() -> Self {
        Response::Error(token::ERROR.to_string())
    }

    /// Wire payload, without line terminator
    pub fn to_line(&self) -> &str {
        match self {
            Response::Ok => OK,
            Response::Value(payload) => payload,
            Response::Error(token) => token,
        }
    }

    /// Classify a line received from the server
    ///
    /// The wire has no escaping, so a payload that equals an error token (a key
    /// literally named `ERROR`, say) is classified as [`Response::Error`].
    pub fn from_line(line: &str) -> Self {
        match line {
            OK => Response::Ok,
            token::TABLE_NOT_FOUND
            | token::EMPTY
            | token::KEY_NOT_FOUND
            | token::ALREADY_EXISTS
            | token::ERROR => Response::Error(line.to_string()),
            payload => Response::Value(payload.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        !matches!(self, Response::Error(_))
    }
}
