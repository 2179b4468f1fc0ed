//! GeminiClient against a local stand-in for the generateContent endpoint.

use huayang_assist::{AssistBridge, AssistError, GeminiClient, GeminiConfig, Generator};
use huayang_core::AssistTarget;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

/// Serve one canned reply on an ephemeral port.
fn serve(status: u16, body: serde_json::Value) -> SocketAddr {
    let route = warp::post()
        .and(warp::path!("v1beta" / "models" / String))
        .and(warp::header::<String>("x-goog-api-key"))
        .and(warp::body::json::<serde_json::Value>())
        .map(move |model: String, key: String, request: serde_json::Value| {
            assert_eq!(model, "gemini-2.5-flash:generateContent");
            assert_eq!(key, "test-key");
            assert!(request["contents"][0]["parts"][0]["text"].is_string());
            warp::reply::with_status(
                warp::reply::json(&body),
                warp::http::StatusCode::from_u16(status).unwrap(),
            )
        });
    let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}

fn client(addr: SocketAddr) -> GeminiClient {
    GeminiClient::new(
        &GeminiConfig::new()
            .with_api_key("test-key")
            .with_base_url(format!("http://{addr}")),
    )
    .unwrap()
}

#[tokio::test]
async fn successful_generation() {
    let addr = serve(
        200,
        serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "<ul><li>古蜀国</li></ul>"}]}}]
        }),
    );
    let bridge = AssistBridge::new(Arc::new(client(addr)));

    let html = bridge
        .generate("<p>华阳县，古蜀国地。</p>", AssistTarget::Annotation)
        .await
        .unwrap();
    assert_eq!(html, "<ul><li>古蜀国</li></ul>");
}

#[tokio::test]
async fn service_error_carries_message() {
    let addr = serve(
        503,
        serde_json::json!({"error": {"code": 503, "message": "model overloaded", "status": "UNAVAILABLE"}}),
    );

    let err = client(addr).generate_text("prompt").await.unwrap_err();
    match err {
        AssistError::Service { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "model overloaded");
        }
        other => panic!("expected Service error, got {other:?}"),
    }
}

#[tokio::test]
async fn connection_refused_is_transport_error() {
    // Bind and drop a listener to get a port nothing listens on
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();

    let err = client(addr).generate_text("prompt").await.unwrap_err();
    assert!(matches!(err, AssistError::Transport(_)));
    assert_eq!(err.user_message(), "AI 助手暂时无法响应，请稍后再试。");
}

#[tokio::test]
async fn response_without_candidates_is_empty() {
    let addr = serve(200, serde_json::json!({"candidates": []}));
    let bridge = AssistBridge::new(Arc::new(client(addr)));

    let err = bridge
        .generate("<p>x</p>", AssistTarget::Translation)
        .await
        .unwrap_err();
    assert!(matches!(err, AssistError::EmptyResponse));
}
