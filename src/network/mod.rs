//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single acceptor loop
//! - One thread per accepted connection, one request per connection
//! - Requests routed through the Dispatcher

mod server;
mod connection;

pub use server::{Server, ShutdownHandle};
pub use connection::Connection;
