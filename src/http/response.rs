//! The response record returned by services.
//!
//! # Responsibilities
//! - Carry status, ordered headers and body from the service to the dispatcher
//! - Offer small builders so services don't assemble tuples by hand
//!
//! # Design Decisions
//! - Headers stay an ordered list of string pairs; conversion to the
//!   backend's header container happens in the dispatcher
//! - `set-cookie` entries are ordinary list entries here; repeating them is
//!   how a service sets several cookies

use bytes::Bytes;
use serde::Serialize;

/// The literal header name routed to the cookie mutator instead of the
/// ordinary header container. Matched exactly and case-sensitively.
pub const SET_COOKIE: &str = "set-cookie";

/// A response produced by a service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Response {
    /// Status code, conventionally 100–599.
    pub status: u16,
    /// Headers in the order they should be applied.
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl Response {
    /// An empty response with the given status.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    /// A `text/plain` response.
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::new(status)
            .with_header("content-type", "text/plain; charset=utf-8")
            .with_body(body.into())
    }

    /// An `application/json` response. Serialization failures become a 500.
    pub fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self::new(status)
                .with_header("content-type", "application/json")
                .with_body(body),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize JSON response");
                Self::new(500)
            }
        }
    }

    /// Append a header, keeping any existing entries with the same name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Append a `set-cookie` header carrying a raw cookie directive.
    pub fn with_cookie(self, directive: impl Into<String>) -> Self {
        self.with_header(SET_COOKIE, directive)
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }
}
