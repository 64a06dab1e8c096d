//! HTTP service adapter.
//!
//! Bridges a connection-per-request HTTP server and a `tower::Service` that
//! maps a [`Request`] record to a [`Response`] record. Cookie-setting
//! response headers are parsed into [`CookieDirective`]s and applied through
//! the server's dedicated cookie primitive instead of as ordinary headers.

// Core subsystems
pub mod config;
pub mod http;
pub mod net;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::AdapterConfig;
pub use http::{
    start, ConnectionHandle, CookieDirective, HttpServer, Request, Response, ServerError,
    ServerHandle,
};
