//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Bind the bounded listener
//! - Run the accept loop, one tokio task per connection
//! - Serve each connection with hyper's HTTP/1.1 driver, handing every
//!   request to the adapter pipeline
//! - Coordinate graceful shutdown

use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Duration;

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use thiserror::Error;
use tokio::task::JoinHandle;
use tower::Service;

use crate::config::{validate_config, AdapterConfig, ValidationError};
use crate::http::adapter::handle_request;
use crate::http::backend::HyperConnection;
use crate::http::request::Request;
use crate::http::response::Response;
use crate::lifecycle::Shutdown;
use crate::net::{ConnectionTracker, Listener, ListenerError};

/// Failures that prevent the server from starting.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid configuration: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "))]
    Config(Vec<ValidationError>),

    /// The listener could not be set up, e.g. the port is taken.
    #[error(transparent)]
    Listener(#[from] ListenerError),
}

/// HTTP server that adapts hyper connections to a [`Service`].
pub struct HttpServer {
    config: AdapterConfig,
}

impl HttpServer {
    pub fn new(config: AdapterConfig) -> Self {
        Self { config }
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Bind the listener and start accepting connections in the background.
    pub async fn start<S>(self, service: S) -> Result<ServerHandle, ServerError>
    where
        S: Service<Request, Response = Response, Error = Infallible> + Clone + Send + 'static,
        S::Future: Send + 'static,
    {
        validate_config(&self.config).map_err(ServerError::Config)?;

        let listener = Listener::bind(&self.config.listener).await?;
        let local_addr = listener.local_addr().map_err(|source| ListenerError::Bind {
            address: self.config.listener.socket_address(),
            source,
        })?;

        let mut builder = http1::Builder::new();
        builder
            .timer(TokioTimer::new())
            .keep_alive(self.config.listener.keep_alive)
            .header_read_timeout(Duration::from_secs(self.config.timeouts.header_read_secs));

        let shutdown = Shutdown::new();
        let tracker = ConnectionTracker::new();
        let accept_task = tokio::spawn(accept_loop(
            listener,
            service,
            builder,
            shutdown.clone(),
            tracker.clone(),
        ));

        tracing::info!(address = %local_addr, "HTTP server started");

        Ok(ServerHandle {
            local_addr,
            shutdown,
            tracker,
            accept_task,
            grace: Duration::from_secs(self.config.timeouts.shutdown_grace_secs),
        })
    }
}

/// Start a server for `service` on `0.0.0.0:port` with default settings.
pub async fn start<S>(service: S, port: u16) -> Result<ServerHandle, ServerError>
where
    S: Service<Request, Response = Response, Error = Infallible> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    let mut config = AdapterConfig::default();
    config.listener.port = port;
    HttpServer::new(config).start(service).await
}

/// Handle to a running server.
///
/// Dropping the handle without calling [`ServerHandle::shutdown`] leaves the
/// server running in the background.
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: Shutdown,
    tracker: ConnectionTracker,
    accept_task: JoinHandle<()>,
    grace: Duration,
}

impl ServerHandle {
    /// The address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn active_connections(&self) -> u64 {
        self.tracker.active_count()
    }

    /// Stop accepting, let in-flight connections finish, then return.
    pub async fn shutdown(self) {
        tracing::info!(
            active_connections = self.tracker.active_count(),
            "HTTP server shutting down"
        );
        self.shutdown.trigger();

        if let Err(e) = self.accept_task.await {
            tracing::error!(error = %e, "Accept loop ended abnormally");
        }

        if !self.tracker.wait_for_idle(self.grace).await {
            tracing::warn!(
                remaining = self.tracker.active_count(),
                "Grace period elapsed with connections still open"
            );
        }

        tracing::info!("HTTP server stopped");
    }
}

async fn accept_loop<S>(
    listener: Listener,
    service: S,
    builder: http1::Builder,
    shutdown: Shutdown,
    tracker: ConnectionTracker,
) where
    S: Service<Request, Response = Response, Error = Infallible> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    let mut stop = shutdown.subscribe();

    loop {
        let accepted = tokio::select! {
            _ = stop.recv() => break,
            accepted = listener.accept() => accepted,
        };

        let (stream, peer_addr, permit) = match accepted {
            Ok(accepted) => accepted,
            Err(ListenerError::Closed) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Accept failed");
                continue;
            }
        };

        let guard = tracker.track();
        let service = service.clone();
        let builder = builder.clone();
        let mut conn_stop = shutdown.subscribe();

        tokio::spawn(async move {
            let _permit = permit;
            let connection_id = guard.id();
            tracing::debug!(connection_id = %connection_id, peer_addr = %peer_addr, "Serving connection");

            let per_request = service_fn(move |request: hyper::Request<Incoming>| {
                handle_request(service.clone(), HyperConnection::new(request))
            });
            let conn = builder.serve_connection(TokioIo::new(stream), per_request);
            tokio::pin!(conn);

            let mut draining = false;
            let result = loop {
                tokio::select! {
                    result = conn.as_mut() => break result,
                    _ = conn_stop.recv(), if !draining => {
                        draining = true;
                        conn.as_mut().graceful_shutdown();
                    }
                }
            };

            if let Err(e) = result {
                tracing::error!(connection_id = %connection_id, error = %e, "Error serving connection");
            }
            drop(guard);
        });
    }

    tracing::debug!("Accept loop stopped");
}
