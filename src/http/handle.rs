//! The per-request connection handle contract.
//!
//! # Responsibilities
//! - Describe what the adapter needs from an underlying server: field
//!   accessors, one body drain, a cookie mutator and a terminal reply
//!
//! # Design Decisions
//! - The handle is a move-only value. Every call that may change server
//!   state consumes `self` and hands back the next handle, so a stale handle
//!   cannot be used again; `reply` consumes it for good
//! - Accessors are plain reads on the current handle
//! - Only the body drain can fail; it is transport-level, not input-level

use std::future::Future;

use bytes::Bytes;
use hyper::HeaderMap;

use crate::http::cookie::CookieDirective;

/// An opaque, single-request handle owned by the underlying server.
pub trait ConnectionHandle: Sized + Send {
    /// What the terminal `reply` produces for the server.
    type Reply;

    /// Transport failure while draining the body.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Raw request method as received.
    fn method(&self) -> &str;

    /// Raw URI scheme (`"http"`, `"https"`, or whatever the server reports).
    fn scheme(&self) -> &str;

    /// Request headers, one pair per value.
    ///
    /// Values of one name keep their received order. Ordering across names
    /// is up to the server.
    fn headers(&self) -> Vec<(String, String)>;

    fn host(&self) -> String;

    fn port(&self) -> Option<u16>;

    fn path(&self) -> String;

    /// Raw query string; empty when there is none.
    fn query(&self) -> String;

    /// Drain the whole request body in one read.
    fn read_body(self) -> impl Future<Output = Result<(Bytes, Self), Self::Error>> + Send;

    /// Attach one cookie to the pending response.
    fn set_cookie(self, cookie: &CookieDirective) -> Self;

    /// Finalize the response. Called exactly once per request.
    fn reply(self, status: u16, headers: HeaderMap, body: Bytes) -> Self::Reply;
}
