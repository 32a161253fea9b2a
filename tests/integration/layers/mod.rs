//! The HTTP layer stack shared by the local and Lambda binaries

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::json;

use letterbox_app::{with_http_layers, MAX_BODY_BYTES};

use crate::common::TestApp;

mod test_http_layers {
    use super::*;

    #[tokio::test]
    async fn test_layered_router_serves_requests() {
        let app = TestApp::new();
        let router = with_http_layers(app.router(), "*");

        let body = json!({"to": "A", "from": "B", "message": "C"}).to_string();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/letters")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ORIGIN, "https://anywhere.test")
            .body(Body::from(body))
            .unwrap();

        let response = app.send_to(router, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }

    #[tokio::test]
    async fn test_oversized_body_rejected_before_handlers() {
        let app = TestApp::new();
        let router = with_http_layers(app.router(), "*");

        let message = "x".repeat(MAX_BODY_BYTES + 1);
        let body = json!({"to": "A", "from": "B", "message": message}).to_string();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/letters")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::CONTENT_LENGTH, body.len())
            .body(Body::from(body))
            .unwrap();

        let response = app.send_to(router, request).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let (_, stats) = app.get_json("/api/stats").await;
        assert_eq!(stats["letters_created"], 0);
    }

    #[tokio::test]
    async fn test_preflight_honours_origin_list() {
        let app = TestApp::new();
        let router = with_http_layers(app.router(), "https://letters.test, https://other.test");

        let preflight = |origin: &str| {
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/reply")
                .header(header::ORIGIN, origin)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap()
        };

        let allowed = app
            .send_to(router.clone(), preflight("https://letters.test"))
            .await;
        assert_eq!(
            allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://letters.test"
        );

        let denied = app.send_to(router, preflight("https://evil.test")).await;
        assert!(denied
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
