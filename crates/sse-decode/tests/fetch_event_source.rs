//! Integration tests for the fetch layer.
//!
//! Uses a mock hyper HTTP server to emit SSE bodies, verifying the full
//! request → status check → decode → callback pipeline.

use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use http_body_util::{BodyExt, StreamBody, combinators::BoxBody};
use hyper::{
    HeaderMap, Request, Response,
    body::{Bytes, Frame, Incoming},
    server::conn::http1,
    service::service_fn,
};
use hyper_util::rt::TokioIo;
use sse_decode::{
    FetchError, ServerSentEvent,
    fetch::{FetchOptions, RequestBody, fetch_event_source},
};
use tokio::{net::TcpListener, time::timeout};

// ---------------------------------------------------------------------------
// Mock server helpers
// ---------------------------------------------------------------------------

/// What the mock server saw.
#[derive(Debug, Default)]
struct Captured {
    method: Option<hyper::Method>,
    headers: HeaderMap,
    body: Vec<u8>,
}

/// Start a mock server answering one request with `chunks` as separate body
/// frames. Returns the address and the captured request.
async fn start_server(
    status: u16,
    content_type: &'static str,
    chunks: Vec<&'static str>,
) -> (SocketAddr, Arc<Mutex<Captured>>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock server");
    let addr = listener.local_addr().expect("local addr");
    let captured = Arc::new(Mutex::new(Captured::default()));
    let seen = Arc::clone(&captured);

    tokio::spawn(async move {
        if let Ok((stream, _)) = listener.accept().await {
            let io = TokioIo::new(stream);
            let _ = http1::Builder::new()
                .serve_connection(
                    io,
                    service_fn(move |req: Request<Incoming>| {
                        let seen = Arc::clone(&seen);
                        let chunks = chunks.clone();
                        async move {
                            let (parts, body) = req.into_parts();
                            let body = body.collect().await.expect("request body").to_bytes();
                            {
                                let mut seen = seen.lock().expect("lock captured");
                                seen.method = Some(parts.method);
                                seen.headers = parts.headers;
                                seen.body = body.to_vec();
                            }

                            let frames = futures_util::stream::iter(
                                chunks
                                    .into_iter()
                                    .map(|c| Ok::<_, Infallible>(Frame::data(Bytes::from(c)))),
                            );
                            let resp = Response::builder()
                                .status(status)
                                .header("content-type", content_type)
                                .body(BoxBody::new(StreamBody::new(frames)))
                                .expect("build response");
                            Ok::<_, Infallible>(resp)
                        }
                    }),
                )
                .await;
        }
    });

    (addr, captured)
}

/// Options collecting every event into the returned vector.
fn collecting_options() -> (FetchOptions, Arc<Mutex<Vec<ServerSentEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let options = FetchOptions::new().on_message(move |event| {
        sink.lock().expect("lock events").push(event);
    });
    (options, events)
}

async fn run(url: String, options: FetchOptions) -> Result<(), FetchError> {
    timeout(Duration::from_secs(5), fetch_event_source(&url, options))
        .await
        .expect("fetch timed out")
}

// ---------------------------------------------------------------------------
// Event delivery
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_events_delivered_in_order() {
    let (addr, _) = start_server(
        200,
        "text/event-stream",
        vec![
            "event: message\ndata: {\"price\":42000}\n\n",
            "event: update\ndata: hel",
            "lo\r",
            "\ndata: world\r\n\r\n",
        ],
    )
    .await;

    let (options, events) = collecting_options();
    let closed = Arc::new(Mutex::new(false));
    let closed_flag = Arc::clone(&closed);
    let options = options.on_close(move || *closed_flag.lock().expect("lock") = true);

    run(format!("http://{addr}/stream"), options)
        .await
        .expect("fetch");

    let events = events.lock().expect("lock events");
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event.as_deref(), Some("message"));
    assert_eq!(events[0].data, "{\"price\":42000}");
    assert_eq!(events[1].event.as_deref(), Some("update"));
    assert_eq!(events[1].data, "hello\nworld");
    assert!(*closed.lock().expect("lock"));
}

#[tokio::test]
async fn test_dangling_event_dropped_at_end_of_body() {
    let (addr, _) = start_server(
        200,
        "text/event-stream",
        vec!["data: complete\n\n", "data: dangling\n"],
    )
    .await;

    let (options, events) = collecting_options();
    run(format!("http://{addr}/stream"), options)
        .await
        .expect("fetch");

    let events = events.lock().expect("lock events");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].data, "complete");
}

#[tokio::test]
async fn test_open_callback_sees_response() {
    let (addr, _) = start_server(200, "text/event-stream", vec![": hi\n\n"]).await;

    let status = Arc::new(Mutex::new(None));
    let seen = Arc::clone(&status);
    let (options, events) = collecting_options();
    let options = options.on_open(move |resp| {
        *seen.lock().expect("lock") = Some(resp.status().as_u16());
    });

    run(format!("http://{addr}/stream"), options)
        .await
        .expect("fetch");

    assert_eq!(*status.lock().expect("lock"), Some(200));
    assert!(events.lock().expect("lock events").is_empty());
}

// ---------------------------------------------------------------------------
// Request shaping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_default_and_caller_headers() {
    let (addr, captured) = start_server(200, "text/event-stream", vec![]).await;

    let (options, _) = collecting_options();
    let options = options
        .data(&serde_json::json!({"prompt": "hello"}))
        .expect("json")
        .header(
            http::header::AUTHORIZATION,
            http::HeaderValue::from_static("Bearer secret"),
        );

    run(format!("http://{addr}/chat"), options)
        .await
        .expect("fetch");

    let captured = captured.lock().expect("lock captured");
    assert_eq!(captured.method, Some(hyper::Method::POST));
    assert_eq!(captured.headers["accept"], "text/event-stream");
    assert_eq!(captured.headers["content-type"], "application/json");
    assert_eq!(captured.headers["authorization"], "Bearer secret");
    assert_eq!(captured.body, br#"{"prompt":"hello"}"#.to_vec());
}

#[tokio::test]
async fn test_caller_content_type_overrides_default() {
    let (addr, captured) = start_server(200, "text/event-stream", vec![]).await;

    let options = FetchOptions::new()
        .body(RequestBody::Text("<q/>".into()))
        .header(
            http::header::CONTENT_TYPE,
            http::HeaderValue::from_static("application/xml"),
        );

    run(format!("http://{addr}/"), options).await.expect("fetch");

    let captured = captured.lock().expect("lock captured");
    assert_eq!(captured.headers["accept"], "application/json");
    assert_eq!(captured.headers["content-type"], "application/xml");
    assert_eq!(captured.body, b"<q/>".to_vec());
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_json_error_message() {
    let (addr, _) = start_server(
        429,
        "application/json",
        vec![r#"{"message":"quota exceeded"}"#],
    )
    .await;

    let reported = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&reported);
    let (options, events) = collecting_options();
    let options = options.on_error(move |err| {
        *sink.lock().expect("lock") = Some(err.to_string());
    });

    let err = run(format!("http://{addr}/stream"), options)
        .await
        .expect_err("should fail");

    assert!(matches!(err, FetchError::Status { .. }));
    assert_eq!(err.status_code(), Some(http::StatusCode::TOO_MANY_REQUESTS));
    assert_eq!(err.to_string(), "quota exceeded");
    assert_eq!(
        reported.lock().expect("lock").as_deref(),
        Some("quota exceeded")
    );
    assert!(events.lock().expect("lock events").is_empty());
}

#[tokio::test]
async fn test_json_error_without_message_uses_default() {
    let (addr, _) = start_server(500, "application/json", vec![r#"{"detail":1}"#]).await;

    let err = run(format!("http://{addr}/"), FetchOptions::new())
        .await
        .expect_err("should fail");
    assert_eq!(err.to_string(), "Error 500: Internal Server Error");
}

#[tokio::test]
async fn test_malformed_json_error_body() {
    let (addr, _) = start_server(400, "application/json", vec!["{not json"]).await;

    let err = run(format!("http://{addr}/"), FetchOptions::new())
        .await
        .expect_err("should fail");
    assert!(matches!(err, FetchError::ErrorBody { .. }));
    assert_eq!(err.to_string(), "Failed to parse error response as JSON");
}

#[tokio::test]
async fn test_text_error_body() {
    let (addr, _) = start_server(403, "text/plain", vec!["forbidden: ", "bad token"]).await;

    let err = run(format!("http://{addr}/"), FetchOptions::new())
        .await
        .expect_err("should fail");
    assert_eq!(err.to_string(), "forbidden: bad token");
    assert_eq!(err.status_code(), Some(http::StatusCode::FORBIDDEN));
}

#[tokio::test]
async fn test_empty_text_error_body_uses_default() {
    let (addr, _) = start_server(404, "text/plain", vec![]).await;

    let err = run(format!("http://{addr}/"), FetchOptions::new())
        .await
        .expect_err("should fail");
    assert_eq!(err.to_string(), "Error 404: Not Found");
}

#[tokio::test]
async fn test_unsupported_charset_aborts() {
    let (addr, _) = start_server(
        200,
        "text/event-stream; charset=utf-16",
        vec!["data: x\n\n"],
    )
    .await;

    let (options, events) = collecting_options();
    let err = run(format!("http://{addr}/"), options)
        .await
        .expect_err("should fail");
    assert!(matches!(err, FetchError::Decode(_)));
    assert!(events.lock().expect("lock events").is_empty());
}

#[tokio::test]
async fn test_invalid_url_reports_config_error() {
    let reported = Arc::new(Mutex::new(false));
    let sink = Arc::clone(&reported);
    let options = FetchOptions::new().on_error(move |_| *sink.lock().expect("lock") = true);

    let err = run("not a url".to_string(), options)
        .await
        .expect_err("should fail");
    assert!(matches!(err, FetchError::Config { .. }));
    assert!(*reported.lock().expect("lock"));
}
