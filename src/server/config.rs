//! Server configuration.

use std::net::SocketAddr;
use std::time::Duration;

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The address to bind to.
    pub addr: SocketAddr,
    /// The maximum number of concurrent connections.
    pub max_connections: usize,
    /// The read buffer size.
    pub read_buffer_size: usize,
    /// The maximum size of a request head, in bytes.
    pub max_head_size: usize,
    /// How long a client may take to send its request head. `None` waits forever.
    pub read_timeout: Option<Duration>,
    /// How long `start` waits for in-flight connections after a stop.
    pub shutdown_timeout: Duration,
}

impl ServerConfig {
    /// Use the given bind address.
    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    /// Cap the number of connections served at once.
    pub fn with_max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Limit how long a client may take to send its request head.
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Set the grace period for in-flight connections on shutdown.
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            max_connections: 1024,
            read_buffer_size: 8192,
            max_head_size: 16 * 1024,
            read_timeout: None,
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}
