//! End-to-end tests over real HTTP.

use std::convert::Infallible;
use std::time::Duration;

use service_adapter::config::AdapterConfig;
use service_adapter::http::echo::echo_service;
use service_adapter::net::ListenerError;
use service_adapter::{HttpServer, Request, Response, ServerError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

mod common;
use common::{fixed, start_local};

#[tokio::test]
async fn cookies_arrive_as_separate_set_cookie_headers() {
    let response = Response::new(201)
        .with_header("x-request-kind", "signup")
        .with_cookie("session=abc123; Max-Age=3600; Path=/; HttpOnly")
        .with_cookie("HttpOnly")
        .with_cookie("prefs=compact, Secure, SameSite=Lax")
        .with_body("created");
    let server = start_local(fixed(response)).await;

    let res = reqwest::get(format!("http://{}/signup", server.local_addr()))
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 201);
    assert_eq!(res.headers()["x-request-kind"], "signup");
    let cookies: Vec<_> = res
        .headers()
        .get_all("set-cookie")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert_eq!(
        cookies,
        [
            "session=abc123; Max-Age=3600; Path=/; HttpOnly",
            "prefs=compact; Secure; SameSite=Lax",
        ]
    );
    assert_eq!(res.text().await.unwrap(), "created");

    server.shutdown().await;
}

#[tokio::test]
async fn echo_reflects_extracted_fields() {
    let server = start_local(echo_service()).await;
    let addr = server.local_addr();

    let client = reqwest::Client::new();
    let res = client
        .post(format!("http://{addr}/things/1?x=1"))
        .header("x-custom", "value")
        .body("payload")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 200);
    assert_eq!(
        res.headers()["set-cookie"],
        "last_query=x=1; Path=/; HttpOnly"
    );

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["method"], "POST");
    assert_eq!(body["scheme"], "http");
    assert_eq!(body["host"], "127.0.0.1");
    assert_eq!(body["port"], addr.port());
    assert_eq!(body["path"], "/things/1");
    assert_eq!(body["query"], "x=1");
    assert_eq!(body["body"], "payload");
    let has_custom = body["headers"]
        .as_array()
        .unwrap()
        .iter()
        .any(|h| h[0] == "x-custom" && h[1] == "value");
    assert!(has_custom);

    server.shutdown().await;
}

#[tokio::test]
async fn empty_query_and_missing_host_over_raw_tcp() {
    let server = start_local(echo_service()).await;

    let mut stream = TcpStream::connect(server.local_addr()).await.unwrap();
    stream
        .write_all(b"WIBBLE /raw? HTTP/1.1\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut raw = String::new();
    stream.read_to_string(&mut raw).await.unwrap();

    assert!(raw.starts_with("HTTP/1.1 200"), "{raw}");
    let json = &raw[raw.find("\r\n\r\n").unwrap() + 4..];
    let body: serde_json::Value = serde_json::from_str(json).unwrap();
    assert_eq!(body["method"], "GET");
    assert_eq!(body["query"], serde_json::Value::Null);
    assert_eq!(body["host"], "");
    assert_eq!(body["port"], serde_json::Value::Null);
    assert!(!raw.to_ascii_lowercase().contains("set-cookie"));

    server.shutdown().await;
}

#[tokio::test]
async fn duplicate_headers_are_grouped_by_name() {
    let server = start_local(echo_service()).await;

    let mut stream = TcpStream::connect(server.local_addr()).await.unwrap();
    stream
        .write_all(
            b"GET / HTTP/1.1\r\nHost: a\r\nX-A: 1\r\nX-B: 2\r\nX-A: 3\r\nConnection: close\r\n\r\n",
        )
        .await
        .unwrap();
    let mut raw = String::new();
    stream.read_to_string(&mut raw).await.unwrap();

    let json = &raw[raw.find("\r\n\r\n").unwrap() + 4..];
    let body: serde_json::Value = serde_json::from_str(json).unwrap();
    let custom: Vec<(&str, &str)> = body["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| (h[0].as_str().unwrap(), h[1].as_str().unwrap()))
        .filter(|(name, _)| name.starts_with("x-"))
        .collect();
    assert_eq!(custom, [("x-a", "1"), ("x-a", "3"), ("x-b", "2")]);

    server.shutdown().await;
}

#[tokio::test]
async fn invalid_status_becomes_internal_server_error() {
    let server = start_local(fixed(Response::text(42, "nope"))).await;

    let res = reqwest::get(format!("http://{}/", server.local_addr()))
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 500);
    assert_eq!(res.text().await.unwrap(), "nope");

    server.shutdown().await;
}

#[tokio::test]
async fn occupied_port_fails_to_start() {
    let first = start_local(echo_service()).await;

    let mut config = AdapterConfig::default();
    config.listener.bind_address = "127.0.0.1".into();
    config.listener.port = first.local_addr().port();
    let err = HttpServer::new(config)
        .start(echo_service())
        .await
        .unwrap_err();
    assert!(matches!(err, ServerError::Listener(ListenerError::Bind { .. })));

    first.shutdown().await;
}

#[tokio::test]
async fn invalid_config_fails_to_start() {
    let mut config = AdapterConfig::default();
    config.listener.max_connections = 0;
    let server = HttpServer::new(config);
    assert_eq!(server.config().listener.max_connections, 0);
    let err = server
        .start(echo_service())
        .await
        .unwrap_err();
    assert!(matches!(err, ServerError::Config(ref errors) if errors.len() == 1));
}

#[tokio::test]
async fn shutdown_waits_for_in_flight_request() {
    let slow = tower::service_fn(|_request: Request| async {
        tokio::time::sleep(Duration::from_millis(200)).await;
        Ok::<_, Infallible>(Response::text(200, "done"))
    });
    let server = start_local(slow).await;
    let url = format!("http://{}/", server.local_addr());

    let in_flight = tokio::spawn(async move { reqwest::get(url).await.unwrap().text().await.unwrap() });
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(server.active_connections(), 1);

    server.shutdown().await;
    assert_eq!(in_flight.await.unwrap(), "done");
}
