//! `ConnectionHandle` over a hyper request.
//!
//! # Responsibilities
//! - Expose the fields of a `hyper::Request<Incoming>` through the handle
//!   accessors
//! - Drain the body once with `http_body_util`
//! - Collect cookies as `Set-Cookie` headers and build the final response
//!
//! # Design Decisions
//! - Scheme comes from an absolute-form URI, otherwise `http` (no TLS here)
//! - Host and port come from the URI authority, otherwise the `Host` header
//! - hyper lower-cases header names and groups repeated names together

use std::str::FromStr;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::header::{HeaderValue, HOST, SET_COOKIE};
use hyper::http::request::Parts;
use hyper::http::uri::Authority;
use hyper::{HeaderMap, StatusCode};

use crate::http::cookie::CookieDirective;
use crate::http::handle::ConnectionHandle;

/// One in-flight hyper request, threaded through the adapter.
#[derive(Debug)]
pub struct HyperConnection {
    parts: Parts,
    /// `None` once drained.
    body: Option<Incoming>,
    cookies: Vec<HeaderValue>,
}

impl HyperConnection {
    pub fn new(request: hyper::Request<Incoming>) -> Self {
        let (parts, body) = request.into_parts();
        Self {
            parts,
            body: Some(body),
            cookies: Vec::new(),
        }
    }

    fn authority(&self) -> Option<Authority> {
        if let Some(authority) = self.parts.uri.authority() {
            return Some(authority.clone());
        }
        let host = self.parts.headers.get(HOST)?.to_str().ok()?;
        Authority::from_str(host).ok()
    }
}

impl ConnectionHandle for HyperConnection {
    type Reply = hyper::Response<Full<Bytes>>;
    type Error = hyper::Error;

    fn method(&self) -> &str {
        self.parts.method.as_str()
    }

    fn scheme(&self) -> &str {
        self.parts.uri.scheme_str().unwrap_or("http")
    }

    /// `HeaderMap` order: names first-seen, values of a name in received
    /// order. Interleaved duplicates come out grouped.
    fn headers(&self) -> Vec<(String, String)> {
        self.parts
            .headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect()
    }

    fn host(&self) -> String {
        self.authority()
            .map(|authority| authority.host().to_string())
            .unwrap_or_default()
    }

    fn port(&self) -> Option<u16> {
        self.authority()?.port_u16()
    }

    fn path(&self) -> String {
        self.parts.uri.path().to_string()
    }

    fn query(&self) -> String {
        self.parts.uri.query().unwrap_or_default().to_string()
    }

    async fn read_body(mut self) -> Result<(Bytes, Self), Self::Error> {
        let body = match self.body.take() {
            Some(incoming) => incoming.collect().await?.to_bytes(),
            None => Bytes::new(),
        };
        Ok((body, self))
    }

    fn set_cookie(mut self, cookie: &CookieDirective) -> Self {
        match HeaderValue::try_from(cookie.to_string()) {
            Ok(value) => self.cookies.push(value),
            Err(_) => {
                tracing::warn!(cookie = %cookie.name(), "Dropping cookie that cannot be sent");
            }
        }
        self
    }

    fn reply(self, status: u16, headers: HeaderMap, body: Bytes) -> Self::Reply {
        let status = StatusCode::from_u16(status).unwrap_or_else(|_| {
            tracing::warn!(status, "Service returned an invalid status code; sending 500");
            StatusCode::INTERNAL_SERVER_ERROR
        });

        let mut response = hyper::Response::new(Full::new(body));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        for cookie in self.cookies {
            response.headers_mut().append(SET_COOKIE, cookie);
        }
        response
    }
}
