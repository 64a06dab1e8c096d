//! Request extraction.
//!
//! Drains the body first, then reads every field once from the handle the
//! drain returned.

use crate::http::handle::ConnectionHandle;
use crate::http::request::{method_from_raw, scheme_from_raw, Request};

/// Build a [`Request`] from a connection handle.
///
/// Issues exactly one body read and calls each accessor at most once. An
/// empty query becomes `None`; unknown methods and schemes fall back to
/// `GET` and `HTTP`.
pub async fn extract<C: ConnectionHandle>(handle: C) -> Result<(Request, C), C::Error> {
    let (body, handle) = handle.read_body().await?;

    let query = handle.query();
    let request = Request {
        body,
        headers: handle.headers(),
        host: handle.host(),
        method: method_from_raw(handle.method()),
        path: handle.path(),
        port: handle.port(),
        query: (!query.is_empty()).then_some(query),
        scheme: scheme_from_raw(handle.scheme()),
    };

    tracing::debug!(
        method = %request.method,
        scheme = %request.scheme,
        host = %request.host,
        path = %request.path,
        body_bytes = request.body.len(),
        "Request extracted"
    );

    Ok((request, handle))
}
