//! Connection Handler
//!
//! Serves exactly one request/response cycle on a client connection.

use std::io::{BufReader, BufWriter};
use std::net::{Shutdown, TcpStream};

use crate::dispatcher::Dispatcher;
use crate::error::Result;
use crate::protocol::{read_request, write_response, Response};

/// Handles a single client connection
///
/// Accepted → Reading request → Dispatching → Writing response → Closed
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Router onto the shared store
    dispatcher: Dispatcher,

    /// Line that ends the request
    terminator: String,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    pub fn new(stream: TcpStream, dispatcher: Dispatcher, terminator: impl Into<String>) -> Result<Self> {
        // Get peer address for logging before we split the stream
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            dispatcher,
            terminator: terminator.into(),
            peer_addr,
        })
    }

    /// Handle the connection: read one request, answer it, close.
    ///
    /// The socket is shut down on every path, including a request that failed to decode.
    pub fn handle(mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        let outcome = self.serve();
        self.close();

        match outcome {
            Err(e) if e.is_disconnect() => {
                tracing::debug!("Client {} disconnected: {}", self.peer_addr, e);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Error serving {}: {}", self.peer_addr, e);
                Err(e)
            }
            Ok(()) => {
                tracing::debug!("Client {} served", self.peer_addr);
                Ok(())
            }
        }
    }

    fn serve(&mut self) -> Result<()> {
        let request = match read_request(&mut self.reader, &self.terminator) {
            Ok(request) => request,
            Err(e) => {
                // Best effort: the peer may already be gone
                let _ = write_response(&mut self.writer, &Response::error());
                return Err(e);
            }
        };

        tracing::trace!("Received request from {}: {}", self.peer_addr, request);

        let response = self.dispatcher.handle(&request);
        write_response(&mut self.writer, &response)
    }

    fn close(&mut self) {
        if let Err(e) = self.writer.get_ref().shutdown(Shutdown::Both) {
            tracing::trace!("Shutdown of {} failed: {}", self.peer_addr, e);
        }
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}
