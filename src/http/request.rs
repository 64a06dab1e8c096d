//! The request record handed to services.
//!
//! # Responsibilities
//! - Define the immutable `Request` record built once per inbound request
//! - Normalize raw method and scheme strings into closed enums
//!
//! # Design Decisions
//! - Normalization is lenient: unknown methods become `GET` and unknown
//!   schemes become `HTTP`, so exotic input never aborts request handling
//! - Matching is exact and case-sensitive

use std::fmt;

use bytes::Bytes;

/// HTTP request method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Patch,
    Trace,
    Connect,
    /// Any other method a service wants to talk about. The normalizer never
    /// produces this variant.
    Other(String),
}

impl Method {
    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Patch => "PATCH",
            Method::Trace => "TRACE",
            Method::Connect => "CONNECT",
            Method::Other(s) => s,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// URI scheme of the inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a raw method string to [`Method`], falling back to `GET`.
pub fn method_from_raw(raw: &str) -> Method {
    match raw {
        "GET" => Method::Get,
        "POST" => Method::Post,
        "PUT" => Method::Put,
        "DELETE" => Method::Delete,
        "HEAD" => Method::Head,
        "OPTIONS" => Method::Options,
        "PATCH" => Method::Patch,
        "TRACE" => Method::Trace,
        "CONNECT" => Method::Connect,
        _ => Method::Get,
    }
}

/// Map a raw scheme string to [`Scheme`], falling back to `HTTP`.
pub fn scheme_from_raw(raw: &str) -> Scheme {
    match raw {
        "http" => Scheme::Http,
        "https" => Scheme::Https,
        _ => Scheme::Http,
    }
}

/// An inbound request, fully extracted from its connection.
///
/// Built once by [`extract`](crate::http::extract::extract) and then owned by
/// the service call that consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The fully drained request body.
    pub body: Bytes,
    /// Header pairs as the server hands them over; duplicates are kept.
    /// The hyper backend lower-cases names and groups them by name, keeping
    /// received order among the values of one name.
    pub headers: Vec<(String, String)>,
    pub host: String,
    pub method: Method,
    pub path: String,
    pub port: Option<u16>,
    /// `None` when the request had no query or an empty one.
    pub query: Option<String>,
    pub scheme: Scheme,
}

impl Request {
    /// First header value whose name matches `name` ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
