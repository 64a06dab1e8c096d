//! Shared utilities for adapter and server tests.

#![allow(dead_code)]

use std::convert::Infallible;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use hyper::HeaderMap;
use service_adapter::config::AdapterConfig;
use service_adapter::http::CookieDirective;
use service_adapter::{ConnectionHandle, HttpServer, Request, Response, ServerHandle};

/// One call observed on a [`RecordingConnection`].
///
/// `generation` identifies which handle value the call was made on: it starts
/// at 0 and every consuming call returns a handle one generation later.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Accessor { name: &'static str, generation: u32 },
    ReadBody { generation: u32 },
    SetCookie { generation: u32, rendered: String },
    Reply { generation: u32 },
}

/// What the terminal reply received.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Canned request data a [`RecordingConnection`] serves.
#[derive(Debug, Clone)]
pub struct Wire {
    pub method: String,
    pub scheme: String,
    pub headers: Vec<(String, String)>,
    pub host: String,
    pub port: Option<u16>,
    pub path: String,
    pub query: String,
    pub body: Bytes,
    /// Makes `read_body` fail with [`Reset`].
    pub fail_body: bool,
}

impl Default for Wire {
    fn default() -> Self {
        Self {
            method: "GET".into(),
            scheme: "http".into(),
            headers: Vec::new(),
            host: "localhost".into(),
            port: Some(8080),
            path: "/".into(),
            query: String::new(),
            body: Bytes::new(),
            fail_body: false,
        }
    }
}

/// A `ConnectionHandle` double that logs every call.
#[derive(Debug)]
pub struct RecordingConnection {
    wire: Wire,
    generation: u32,
    body_drained: bool,
    log: Arc<Mutex<Vec<Call>>>,
}

impl RecordingConnection {
    pub fn new(wire: Wire) -> (Self, Arc<Mutex<Vec<Call>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let conn = Self {
            wire,
            generation: 0,
            body_drained: false,
            log: Arc::clone(&log),
        };
        (conn, log)
    }

    fn record(&self, call: Call) {
        self.log.lock().unwrap().push(call);
    }

    fn accessor(&self, name: &'static str) {
        self.record(Call::Accessor {
            name,
            generation: self.generation,
        });
    }

    fn next(mut self) -> Self {
        self.generation += 1;
        self
    }
}

#[derive(Debug, thiserror::Error)]
#[error("connection reset")]
pub struct Reset;

impl ConnectionHandle for RecordingConnection {
    type Reply = Reply;
    type Error = Reset;

    fn method(&self) -> &str {
        self.accessor("method");
        &self.wire.method
    }

    fn scheme(&self) -> &str {
        self.accessor("scheme");
        &self.wire.scheme
    }

    fn headers(&self) -> Vec<(String, String)> {
        self.accessor("headers");
        self.wire.headers.clone()
    }

    fn host(&self) -> String {
        self.accessor("host");
        self.wire.host.clone()
    }

    fn port(&self) -> Option<u16> {
        self.accessor("port");
        self.wire.port
    }

    fn path(&self) -> String {
        self.accessor("path");
        self.wire.path.clone()
    }

    fn query(&self) -> String {
        self.accessor("query");
        self.wire.query.clone()
    }

    async fn read_body(mut self) -> Result<(Bytes, Self), Self::Error> {
        self.record(Call::ReadBody {
            generation: self.generation,
        });
        if self.wire.fail_body {
            return Err(Reset);
        }
        let body = if self.body_drained {
            Bytes::new()
        } else {
            self.body_drained = true;
            self.wire.body.clone()
        };
        Ok((body, self.next()))
    }

    fn set_cookie(self, cookie: &CookieDirective) -> Self {
        self.record(Call::SetCookie {
            generation: self.generation,
            rendered: cookie.to_string(),
        });
        self.next()
    }

    fn reply(self, status: u16, headers: HeaderMap, body: Bytes) -> Self::Reply {
        self.record(Call::Reply {
            generation: self.generation,
        });
        Reply {
            status,
            headers,
            body,
        }
    }
}

/// A service that always returns the given response.
pub fn fixed(
    response: Response,
) -> impl tower::Service<
    Request,
    Response = Response,
    Error = Infallible,
    Future = std::future::Ready<Result<Response, Infallible>>,
> + Clone
       + Send
       + 'static {
    tower::service_fn(move |_request: Request| std::future::ready(Ok::<_, Infallible>(response.clone())))
}

/// Start a server on an ephemeral localhost port.
pub async fn start_local<S>(service: S) -> ServerHandle
where
    S: tower::Service<Request, Response = Response, Error = Infallible> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    let mut config = AdapterConfig::default();
    config.listener.bind_address = "127.0.0.1".into();
    config.listener.port = 0;
    config.timeouts.shutdown_grace_secs = 2;
    HttpServer::new(config).start(service).await.unwrap()
}
