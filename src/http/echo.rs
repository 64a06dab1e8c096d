//! Echo service used by the binary.
//!
//! Answers every request with a JSON description of what the adapter
//! extracted, and remembers a non-empty query in a cookie.
//!
//! Only queries that cannot be read as more than one cookie fragment are
//! remembered; a query containing a fragment separator gets no cookie.

use std::convert::Infallible;
use std::future::{ready, Ready};

use serde_json::json;
use tower::service_fn;
use tower::util::ServiceFn;

use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::token::is_valid_token;

/// Build the echo response for one request.
pub fn echo(request: Request) -> Response {
    let body = json!({
        "method": request.method.as_str(),
        "scheme": request.scheme.as_str(),
        "host": request.host,
        "port": request.port,
        "path": request.path,
        "query": request.query,
        "headers": request.headers,
        "body": String::from_utf8_lossy(&request.body),
    });

    let mut response = Response::json(200, &body);
    if let Some(query) = request.query.as_deref().filter(|q| is_cookie_safe(q)) {
        response = response.with_cookie(format!("last_query={query}; Path=/; HttpOnly"));
    }
    response
}

fn is_cookie_safe(query: &str) -> bool {
    is_valid_token(query) && !query.contains(|c: char| c == ';' || c == ',')
}

/// The echo handler as a `tower::Service`.
pub fn echo_service() -> ServiceFn<EchoFn> {
    let handler: EchoFn = |request| ready(Ok(echo(request)));
    service_fn(handler)
}

/// Signature of the echo handler.
pub type EchoFn = fn(Request) -> Ready<Result<Response, Infallible>>;
