//! HTTP server implementation.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Semaphore, watch};
use tokio::task::JoinSet;
use log::{debug, error, info, warn};

use crate::server::config::ServerConfig;
use crate::server::error::Error;
use crate::server::handler::{BlockingHandler, Handler, HandlerRegistry};
use crate::server::request::Request;

/// Lifecycle of the accept loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Stopped,
    Running,
}

/// An HTTP server.
///
/// Handlers are registered through `&mut self` before the server is shared,
/// so the registry is read-only while connections are served.
pub struct HttpServer {
    /// The server configuration.
    pub config: ServerConfig,
    routes: Arc<HandlerRegistry>,
    listener: TcpListener,
    state: watch::Sender<ServerState>,
}

impl HttpServer {
    /// Bind a new HTTP server to the configured address.
    pub async fn bind(config: ServerConfig) -> Result<Self, Error> {
        let listener = TcpListener::bind(config.addr).await?;
        info!("Server listening on http://{addr}", addr = listener.local_addr()?);

        let (state, _) = watch::channel(ServerState::Stopped);
        Ok(Self {
            config,
            routes: Arc::new(HandlerRegistry::new()),
            listener,
            state,
        })
    }

    /// The address the server is actually bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        Ok(self.listener.local_addr()?)
    }

    /// Add a route served by an async closure.
    pub fn add_route<F, Fut>(&mut self, path: impl Into<String>, handler: F)
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), Error>> + Send + 'static,
    {
        self.add_handler(path, handler);
    }

    /// Add a route served by any [`Handler`].
    ///
    /// Registering a path twice replaces the earlier handler.
    pub fn add_handler(&mut self, path: impl Into<String>, handler: impl Handler) {
        Arc::make_mut(&mut self.routes).register(path, Arc::new(handler));
    }

    /// Add a route served by a synchronous closure on the blocking pool.
    pub fn add_blocking_route<F>(&mut self, path: impl Into<String>, handler: F)
    where
        F: Fn(&mut Request) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.add_handler(path, BlockingHandler::new(handler));
    }

    /// The registered handlers.
    pub fn routes(&self) -> &HandlerRegistry {
        &self.routes
    }

    /// Whether the accept loop is currently running.
    pub fn state(&self) -> ServerState {
        *self.state.borrow()
    }

    /// Ask a running accept loop to exit.
    ///
    /// A pending accept is interrupted. Connections already accepted are not
    /// cancelled. Calling this on a server that is not running has no effect.
    pub fn stop(&self) {
        self.state.send_if_modified(|state| {
            if *state == ServerState::Running {
                *state = ServerState::Stopped;
                true
            } else {
                false
            }
        });
    }

    /// Log the registered endpoints.
    fn display_server_info(&self) {
        info!("Registered endpoints:");
        for path in self.routes.paths() {
            info!("  GET {path}");
        }
    }

    /// Hand an accepted connection to its own task.
    fn handle_new_connection(
        &self,
        socket: TcpStream,
        addr: SocketAddr,
        semaphore: &Arc<Semaphore>,
        tasks: &mut JoinSet<()>,
    ) {
        // Try to acquire a permit from the semaphore
        let permit = match semaphore.clone().try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                warn!("Connection limit reached, dropping connection from {addr}");
                return;
            }
        };
        debug!("Accepted connection from {addr}");

        let routes = self.routes.clone();
        let config = self.config.clone();

        tasks.spawn(async move {
            // The permit is dropped when the task completes, releasing the semaphore slot
            let _permit = permit;

            match Self::handle_connection(socket, routes, &config).await {
                Ok(()) => {}
                Err(Error::NotFound(path)) => {
                    debug!("No handler for {path}, closing connection from {addr}");
                }
                Err(Error::ParseError(e)) => {
                    warn!("Dropping malformed request from {addr}: {e}");
                }
                Err(e) => {
                    error!("Error handling connection from {addr}: {e}");
                }
            }
        });
    }

    /// Wait for in-flight connections, then leave the rest running on their own.
    async fn perform_shutdown(tasks: &mut JoinSet<()>, shutdown_timeout: Duration) {
        info!("Waiting for {len} active connections to complete...", len = tasks.len());
        let _ = tokio::time::timeout(shutdown_timeout, async {
            while let Some(res) = tasks.join_next().await {
                if let Err(e) = res {
                    error!("Task failed during shutdown: {e}");
                }
            }
        }).await;

        if !tasks.is_empty() {
            warn!("{len} connections still active, detaching them", len = tasks.len());
            tasks.detach_all();
        }

        info!("Server shutdown complete");
    }

    /// Run the accept loop until [`stop`](Self::stop) is called.
    ///
    /// Each accepted connection is served by its own task, so a handler that
    /// never finishes only ties up its own connection. A failing `accept`
    /// ends the loop and is returned.
    pub async fn start(&self) -> Result<(), Error> {
        let started = self.state.send_if_modified(|state| {
            if *state == ServerState::Running {
                false
            } else {
                *state = ServerState::Running;
                true
            }
        });
        if !started {
            return Err(Error::AlreadyRunning);
        }
        let mut state_rx = self.state.subscribe();

        self.display_server_info();

        // Create a semaphore to limit concurrent connections
        let semaphore = Arc::new(Semaphore::new(self.config.max_connections));

        // Use JoinSet to keep track of all spawned tasks
        let mut tasks = JoinSet::new();

        let result = loop {
            // A stop issued before we subscribed is already visible here
            if *state_rx.borrow_and_update() == ServerState::Stopped {
                info!("Shutting down server...");
                break Ok(());
            }

            tokio::select! {
                // The sender lives in `self`, so this only wakes on a state change
                _ = state_rx.changed() => {}

                // Reap finished connections
                Some(res) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(e) = res {
                        error!("Connection task failed: {e}");
                    }
                }

                // Accept new connections
                accept_result = self.listener.accept() => {
                    match accept_result {
                        Ok((socket, addr)) => {
                            self.handle_new_connection(socket, addr, &semaphore, &mut tasks);
                        }
                        Err(e) => {
                            error!("Error accepting connection, shutting down: {e}");
                            break Err(Error::IoError(e));
                        }
                    }
                }
            }
        };

        self.state.send_replace(ServerState::Stopped);
        Self::perform_shutdown(&mut tasks, self.config.shutdown_timeout).await;

        result
    }

    /// Serve a single connection.
    ///
    /// Reads and parses the request head, then runs the handler registered for
    /// its path. When no handler matches, the stream is closed without writing
    /// anything and [`Error::NotFound`] is returned.
    pub async fn handle_connection<S>(
        stream: S,
        routes: Arc<HandlerRegistry>,
        config: &ServerConfig,
    ) -> Result<(), Error>
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (read_half, write_half) = tokio::io::split(stream);
        let mut reader = BufReader::with_capacity(config.read_buffer_size, read_half);

        let read = Request::read_from(&mut reader, Box::new(write_half), config.max_head_size);
        let request = match config.read_timeout {
            Some(timeout) => tokio::time::timeout(timeout, read)
                .await
                .map_err(|_| std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out reading request head"))??,
            None => read.await?,
        };
        debug!("{method} {path}", method = request.method(), path = request.path());

        let handler = routes
            .lookup(request.path())
            .ok_or_else(|| Error::NotFound(request.path().to_string()))?;

        handler.handle(request).await
    }
}
