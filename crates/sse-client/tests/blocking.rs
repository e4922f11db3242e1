//! Blocking client tests; the server runs on a separate tokio runtime

#![cfg(feature = "blocking")]

use sse_client::blocking::{self, SseRequestExt};
use sse_client::testing::{chunked_route, TestServer};
use sse_client::{ContentTypePolicy, Method, SseError};
use tokio::runtime::Runtime;

fn start(router: axum::Router) -> (Runtime, TestServer) {
    let rt = Runtime::new().unwrap();
    let server = rt.block_on(TestServer::start(router)).unwrap();
    (rt, server)
}

#[test]
fn test_blocking_events() {
    let (_rt, server) = start(chunked_route(
        "/sse",
        "text/event-stream",
        vec!["event: ping\nda", "ta: 1\n\ndata: 2\r", "\n\r\n"],
    ));

    let client = blocking::Client::new();
    let source = blocking::connect_sse(&client, Method::GET, server.url("/sse")).unwrap();
    let events: Vec<_> = source.events().unwrap().map(|e| e.unwrap()).collect();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event(), "ping");
    assert_eq!(events[0].data(), "1");
    assert_eq!(events[1].event(), "message");
    assert_eq!(events[1].data(), "2");
}

#[test]
fn test_blocking_lines() {
    let (_rt, server) = start(chunked_route(
        "/sse",
        "text/event-stream",
        vec!["a\rb", "\nc"],
    ));

    let source = blocking::Client::new()
        .get(server.url("/sse"))
        .connect_sse()
        .unwrap();
    let lines: Vec<_> = source.lines().unwrap().map(|l| l.unwrap()).collect();

    assert_eq!(lines, vec!["a", "b", "c"]);
}

#[test]
fn test_blocking_rejects_wrong_content_type() {
    let (_rt, server) = start(chunked_route("/sse", "application/json", vec!["{}"]));

    let client = blocking::SseClient::new().unwrap();
    let err = client.get(server.url("/sse")).unwrap_err();
    assert!(matches!(
        err,
        SseError::InvalidContentType {
            policy: ContentTypePolicy::Exact,
            ..
        }
    ));
}

#[test]
fn test_blocking_client_policy_override() {
    let (_rt, server) = start(chunked_route(
        "/sse",
        "application/json, text/event-stream",
        vec!["data: ok\n\n"],
    ));

    let client = blocking::SseClient::new()
        .unwrap()
        .with_policy(ContentTypePolicy::Contains);
    let events: Vec<_> = client
        .get(server.url("/sse"))
        .unwrap()
        .events()
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].data(), "ok");
}

#[test]
fn test_blocking_malformed_url_rejected() {
    let client = blocking::SseClient::new().unwrap();
    let err = client.get("no scheme here").unwrap_err();
    assert!(matches!(err, SseError::InvalidUrl(_)));
}
