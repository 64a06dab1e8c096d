//! Response dispatch.
//!
//! # Responsibilities
//! - Split response headers into ordinary headers and `set-cookie` headers
//! - Fold every parsed cookie onto the handle, one mutator call each
//! - Finalize with a single `reply` carrying status, ordinary headers and body
//!
//! # Design Decisions
//! - The split is an exact, case-sensitive match on `set-cookie`
//! - A cookie header that yields no directive is skipped, not an error
//! - Ordinary headers the backend cannot represent are dropped with a warning;
//!   the rest of the response still goes out

use hyper::header::{HeaderName, HeaderValue};
use hyper::HeaderMap;

use crate::http::cookie::CookieDirective;
use crate::http::handle::ConnectionHandle;
use crate::http::response::{Response, SET_COOKIE};

/// Headers separated by how they reach the connection.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PartitionedHeaders {
    pub ordinary: Vec<(String, String)>,
    /// Raw `set-cookie` values in response order.
    pub cookies: Vec<String>,
}

/// Partition headers, preserving relative order within each group.
pub fn partition_headers(headers: Vec<(String, String)>) -> PartitionedHeaders {
    let mut partitioned = PartitionedHeaders::default();
    for (name, value) in headers {
        if name == SET_COOKIE {
            partitioned.cookies.push(value);
        } else {
            partitioned.ordinary.push((name, value));
        }
    }
    partitioned
}

/// Convert ordinary headers into a `HeaderMap`, appending duplicates.
pub fn to_header_map(headers: Vec<(String, String)>) -> HeaderMap {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let parsed = HeaderName::from_bytes(name.as_bytes())
            .ok()
            .zip(HeaderValue::from_str(&value).ok());
        match parsed {
            Some((name, value)) => {
                map.append(name, value);
            }
            None => {
                tracing::warn!(header = %name, "Dropping response header that cannot be sent");
            }
        }
    }
    map
}

/// Apply a service's response to the connection and finalize it.
pub fn dispatch<C: ConnectionHandle>(response: Response, handle: C) -> C::Reply {
    let Response {
        status,
        headers,
        body,
    } = response;
    let PartitionedHeaders { ordinary, cookies } = partition_headers(headers);
    let ordinary = to_header_map(ordinary);

    let mut handle = handle;
    for raw in &cookies {
        match CookieDirective::parse(raw) {
            Some(directive) => {
                handle = handle.set_cookie(&directive);
            }
            None => {
                tracing::debug!(directive = %raw, "Skipping set-cookie header with no cookie name");
            }
        }
    }

    tracing::debug!(
        status,
        headers = ordinary.len(),
        cookies = cookies.len(),
        body_bytes = body.len(),
        "Dispatching response"
    );

    handle.reply(status, ordinary, body)
}
