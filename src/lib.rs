//! # jsontab
//!
//! An embedded, network-exposed JSON document store with:
//! - Named tables of key → JSON document, one file per table
//! - Whole-file read-modify-write persistence
//! - One process-wide read/write lock over every operation
//! - A line-oriented TCP protocol, one request per connection
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │            (one thread per connection)                       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  Query Dispatcher                            │
//! │        (parse command, map errors to wire tokens)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    Table Store                               │
//! │            (RwLock over registry + files)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                       ▼
//!               ┌─────────────┐          ┌─────────────┐
//!               │    Codec    │◄─────────│  Bootstrap  │
//!               │ (JSON file) │          │ (seed files)│
//!               └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod store;
pub mod protocol;
pub mod dispatcher;
pub mod network;
pub mod bootstrap;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{JsontabError, Result};
pub use config::Config;
pub use store::Store;
pub use dispatcher::Dispatcher;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of jsontab
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
