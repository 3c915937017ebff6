//! Error types for jsontab
//!
//! Provides a unified error type for all operations, plus the single
//! mapping from error kind to wire token.

use thiserror::Error;

/// Result type alias using JsontabError
pub type Result<T> = std::result::Result<T, JsontabError>;

/// Unified error type for jsontab operations
#[derive(Debug, Error)]
pub enum JsontabError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Table / Key Errors
    // -------------------------------------------------------------------------
    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Table is empty: {0}")]
    EmptyTable(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Table already exists: {0}")]
    TableAlreadyExists(String),

    // -------------------------------------------------------------------------
    // Storage / Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Wire tokens sent back to clients in place of a payload
pub mod token {
    pub const TABLE_NOT_FOUND: &str = "TABLE_NOT_FOUND";
    pub const EMPTY: &str = "EMPTY";
    pub const KEY_NOT_FOUND: &str = "KEY_NOT_FOUND";
    pub const ALREADY_EXISTS: &str = "ALREADY_EXISTS";
    pub const ERROR: &str = "ERROR";
}

impl JsontabError {
    /// Map this error onto the token a client sees.
    ///
    /// Anything that is not one of the four classified outcomes degrades to `ERROR`.
    pub fn wire_token(&self) -> &'static str {
        match self {
            JsontabError::TableNotFound(_) => token::TABLE_NOT_FOUND,
            JsontabError::EmptyTable(_) => token::EMPTY,
            JsontabError::KeyNotFound(_) => token::KEY_NOT_FOUND,
            JsontabError::TableAlreadyExists(_) => token::ALREADY_EXISTS,
            JsontabError::Io(_)
            | JsontabError::Storage(_)
            | JsontabError::Decode(_)
            | JsontabError::Json(_)
            | JsontabError::Protocol(_)
            | JsontabError::Config(_) => token::ERROR,
        }
    }

    /// True for IO errors that just mean the peer went away
    pub fn is_disconnect(&self) -> bool {
        match self {
            JsontabError::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::UnexpectedEof
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::BrokenPipe
            ),
            _ => false,
        }
    }
}
