//! Request handlers and the path registry.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use log::debug;

use crate::server::error::Error;
use crate::server::request::Request;

/// Type alias for the boxed future a handler returns.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<(), Error>> + Send>>;

/// Something that answers requests.
///
/// A handler communicates only through the [`Request`] it is given: it reads
/// the path, query and headers, adds response headers, and sends the response
/// once. The returned error, if any, is logged by the server.
///
/// Any `Fn(Request) -> impl Future<Output = Result<(), Error>>` is a handler.
///
/// Handlers run as tasks on the server's runtime and must not block the
/// thread: a handler stuck in `std::thread::sleep` or synchronous I/O holds a
/// runtime worker and delays every connection scheduled behind it. Wrap
/// blocking work in [`BlockingHandler`], or move it onto
/// `tokio::task::spawn_blocking` yourself.
pub trait Handler: Send + Sync + 'static {
    /// Handle one request.
    fn handle(&self, request: Request) -> HandlerFuture;
}

impl<F, Fut> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), Error>> + Send + 'static,
{
    fn handle(&self, request: Request) -> HandlerFuture {
        Box::pin(self(request))
    }
}

/// Runs a synchronous handler on tokio's blocking thread pool.
///
/// The closure gets the request by reference and answers with
/// [`Request::send_response_blocking`]. Each request occupies one blocking
/// thread while the closure runs, so slow closures do not hold up other
/// connections.
pub struct BlockingHandler<F> {
    f: Arc<F>,
}

impl<F> BlockingHandler<F>
where
    F: Fn(&mut Request) -> Result<(), Error> + Send + Sync + 'static,
{
    /// Wrap a synchronous closure.
    pub fn new(f: F) -> Self {
        Self { f: Arc::new(f) }
    }
}

impl<F> Handler for BlockingHandler<F>
where
    F: Fn(&mut Request) -> Result<(), Error> + Send + Sync + 'static,
{
    fn handle(&self, mut request: Request) -> HandlerFuture {
        let f = self.f.clone();
        Box::pin(async move {
            tokio::task::spawn_blocking(move || (*f)(&mut request))
                .await
                .map_err(|e| Error::InternalError(format!("Blocking handler failed: {e}")))?
        })
    }
}

/// Maps exact request paths to handlers.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn Handler>>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `handler` with `path`, replacing any earlier registration.
    pub fn register(&mut self, path: impl Into<String>, handler: Arc<dyn Handler>) {
        let path = path.into();
        if self.handlers.insert(path.clone(), handler).is_some() {
            debug!("Replaced handler for {path}");
        }
    }

    /// Find the handler for `path`.
    pub fn lookup(&self, path: &str) -> Option<Arc<dyn Handler>> {
        self.handlers.get(path).cloned()
    }

    /// The registered paths, in no particular order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// The number of registered paths.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no path is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.paths()).finish()
    }
}
