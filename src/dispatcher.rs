//! Query Dispatcher
//!
//! Turns a request body into a store call and the store's outcome into a response.
//!
//! ## Responsibilities
//! - Parse the request with [`Command::parse`]
//! - Route each command to the matching [`Store`] operation
//! - Render success payloads (`OK!`, JSON object, bare key)
//! - Map every failure onto its wire token in one place

use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::protocol::{Command, Filter, Response};
use crate::store::Store;

/// Stateless router over a shared store; cheap to clone across connections
#[derive(Clone)]
pub struct Dispatcher {
    store: Arc<Store>,
}

impl Dispatcher {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Parse, execute and render one request body. Never fails: errors become tokens.
    pub fn handle(&self, request: &str) -> Response {
        let outcome = Command::parse(request).and_then(|command| {
            tracing::trace!(?command, "dispatching");
            self.execute(&command)
        });

        match outcome {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(error = %e, "request failed");
                Response::from_error(&e)
            }
        }
    }

    /// Execute a command
    ///
    /// Routes commands to appropriate store operations
    pub fn execute(&self, command: &Command) -> Result<Response> {
        match command {
            Command::Create { table } => {
                self.store.create_table(table)?;
                Ok(Response::Ok)
            }
            Command::CreateKey { table, key, value } => {
                self.store
                    .upsert(table, key, Value::String(value.clone()))?;
                Ok(Response::Ok)
            }
            Command::Select {
                table,
                key,
                filter: None,
            } => {
                let documents = self.store.get(table, key)?;
                Ok(Response::value(serde_json::to_string(&documents)?))
            }
            Command::Select {
                table,
                key,
                filter: Some(Filter { field, op, value }),
            } => {
                let documents = self.store.get_filtered(table, key, field, *op, value)?;
                Ok(Response::value(serde_json::to_string(&documents)?))
            }
            Command::Modify {
                table,
                key,
                field,
                value,
            } => {
                self.store
                    .update(table, key, field, Value::String(value.clone()))?;
                Ok(Response::Ok)
            }
            Command::Delete { table } => {
                self.store.delete_table(table)?;
                Ok(Response::Ok)
            }
            Command::DeleteKey { table, key } => {
                self.store.delete_key(table, key)?;
                Ok(Response::Ok)
            }
            Command::GetLastIndex { table } => Ok(Response::value(self.store.last_index(table)?)),
        }
    }

    /// Get the shared store
    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }
}
