//! TCP Server
//!
//! Accepts connections and starts one handler thread per connection.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::error::Result;
use crate::store::Store;

use super::Connection;

/// TCP server for jsontab
///
/// No connection cap and no backpressure: every accepted socket gets its own thread.
pub struct Server {
    config: Config,
    listener: TcpListener,
    dispatcher: Dispatcher,
    shutdown: Arc<AtomicBool>,
    next_connection_id: AtomicU64,
}

impl Server {
    /// Bind the listen address from `config`
    pub fn bind(config: Config, store: Arc<Store>) -> Result<Self> {
        config.validate()?;
        let listener = TcpListener::bind(&config.listen_addr)?;

        Ok(Self {
            config,
            listener,
            dispatcher: Dispatcher::new(store),
            shutdown: Arc::new(AtomicBool::new(false)),
            next_connection_id: AtomicU64::new(1),
        })
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Handle for stopping [`Server::run`] from another thread
    pub fn shutdown_handle(&self) -> Result<ShutdownHandle> {
        Ok(ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
            addr: self.local_addr()?,
        })
    }

    /// Start the server (blocking until shut down)
    ///
    /// Accept errors are logged and the loop keeps serving.
    pub fn run(&self) -> Result<()> {
        tracing::info!("Listening on {}", self.local_addr()?);

        for stream in self.listener.incoming() {
            if self.shutdown.load(Ordering::SeqCst) {
                break;
            }

            match stream {
                Ok(stream) => self.spawn_handler(stream),
                Err(e) => tracing::warn!("Failed to accept connection: {}", e),
            }
        }

        tracing::info!("Accept loop stopped");
        Ok(())
    }

    fn spawn_handler(&self, stream: TcpStream) {
        let id = self.next_connection_id.fetch_add(1, Ordering::Relaxed);
        let dispatcher = self.dispatcher.clone();
        let terminator = self.config.terminator.clone();

        let spawned = thread::Builder::new()
            .name(format!("conn-{}", id))
            .spawn(move || {
                // `handle` logs its own failures
                match Connection::new(stream, dispatcher, terminator) {
                    Ok(connection) => {
                        let _ = connection.handle();
                    }
                    Err(e) => tracing::warn!("Failed to set up connection {}: {}", id, e),
                }
            });

        if let Err(e) = spawned {
            tracing::warn!("Failed to spawn handler for connection {}: {}", id, e);
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Stops a running [`Server`]
#[derive(Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
    addr: SocketAddr,
}

impl ShutdownHandle {
    /// Signal the server to stop; wakes the blocked accept with a throwaway connection
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);

        let mut wake = self.addr;
        if wake.ip().is_unspecified() {
            let loopback = match wake.ip() {
                IpAddr::V4(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
                IpAddr::V6(_) => IpAddr::V6(Ipv6Addr::LOCALHOST),
            };
            wake.set_ip(loopback);
        }
        if let Err(e) = TcpStream::connect(wake) {
            tracing::debug!("Shutdown wake-up connect failed: {}", e);
        }
    }
}
