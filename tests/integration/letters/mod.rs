//! Letter creation and opening through the composed router

use axum::{body::Body, http::Request};
use serde_json::json;
use uuid::Uuid;

use crate::common::{TestApp, BASE_URL};

mod test_token_letters {
    use super::*;

    #[tokio::test]
    async fn test_health_and_root() {
        let app = TestApp::new();

        let response = app
            .send(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await;
        assert_eq!(response.status(), 200);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"OK");
    }

    #[tokio::test]
    async fn test_create_and_open_letter() {
        let app = TestApp::new();

        let created = app
            .create_letter(json!({
                "to": "Juliet",
                "from": "Romeo",
                "message": "O, she doth teach the torches to burn bright!",
                "theme": "red",
                "senderEmail": "romeo@example.com",
                "musicUrl": "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
            }))
            .await;

        let reference = created["reference"].as_str().unwrap();
        assert_eq!(created["url"], format!("{}/open?d={}", BASE_URL, reference));
        assert_eq!(created["musicId"], "dQw4w9WgXcQ");

        let (status, opened) = app.get_json(&format!("/api/letters/{}", reference)).await;
        assert_eq!(status, 200);
        assert_eq!(opened["letterId"], created["letterId"]);
        assert_eq!(
            opened["letter"],
            json!({
                "to": "Juliet",
                "from": "Romeo",
                "message": "O, she doth teach the torches to burn bright!",
                "theme": "red",
                "senderEmail": "romeo@example.com",
                "musicId": "dQw4w9WgXcQ"
            })
        );
    }

    #[tokio::test]
    async fn test_same_letter_sent_twice_gets_two_reply_slots() {
        let app = TestApp::new();
        let body = json!({
            "to": "Mom",
            "from": "Sam",
            "message": "Happy Valentine's Day!",
            "senderEmail": "sam@example.com"
        });

        let first = app.create_letter(body.clone()).await;
        let second = app.create_letter(body).await;
        assert_ne!(first["letterId"], second["letterId"]);

        for created in [&first, &second] {
            let (_, opened) = app
                .get_json(&format!("/api/letters/{}", created["reference"].as_str().unwrap()))
                .await;
            assert_eq!(opened["letterId"], created["letterId"]);
            assert_eq!(opened["letter"]["to"], "Mom");

            let (_, replied) = app
                .post_json(
                    "/api/reply",
                    json!({"id": created["letterId"], "answer": "yes", "senderEmail": "sam@example.com", "recipientName": "Mom"}),
                )
                .await;
            assert_eq!(replied, json!({ "success": true }));
        }

        // Each recipient's answer reaches the sender
        assert_eq!(app.sent_count(), 2);
    }

    #[tokio::test]
    async fn test_open_garbage_link_is_bad_request() {
        let app = TestApp::new();

        for reference in ["AAAA", "zzzzzzzzzzzz", "a-b+c"] {
            let (status, body) = app.get_json(&format!("/api/letters/{}", reference)).await;
            assert_eq!(status, 400, "reference {}", reference);
            assert_eq!(body["error"]["code"], "INVALID_LINK");
        }
    }

    #[tokio::test]
    async fn test_create_rejects_blank_fields() {
        let app = TestApp::new();

        let (status, body) = app
            .post_json("/api/letters", json!({"to": "A", "from": "B", "message": "   "}))
            .await;
        assert_eq!(status, 400);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (status, _) = app
            .post_json(
                "/api/letters",
                json!({"to": "A", "from": "B", "message": "C", "senderEmail": "nope"}),
            )
            .await;
        assert_eq!(status, 400);
    }
}

mod test_record_letters {
    use super::*;

    #[tokio::test]
    async fn test_create_and_open_record_letter() {
        let app = TestApp::with_record_persistence();

        let created = app
            .create_letter(json!({"to": "Juliet", "from": "Romeo", "message": "Hi", "theme": "purple"}))
            .await;

        let reference = created["reference"].as_str().unwrap();
        let id = Uuid::parse_str(reference).unwrap();
        assert_eq!(created["letterId"], id.to_string());
        assert_eq!(created["url"], format!("{}/invitation/{}", BASE_URL, id));
        assert_eq!(app.letters_repo.as_ref().unwrap().len(), 1);

        let (status, opened) = app.get_json(&format!("/api/letters/{}", id)).await;
        assert_eq!(status, 200);
        assert_eq!(opened["letter"]["theme"], "purple");
        assert_eq!(opened["letter"]["senderEmail"], "");
    }

    #[tokio::test]
    async fn test_record_letter_invalid_and_missing() {
        let app = TestApp::with_record_persistence();

        let (status, body) = app.get_json("/api/letters/not-a-uuid").await;
        assert_eq!(status, 400);
        assert_eq!(body["error"]["code"], "INVALID_LINK");

        let (status, body) = app
            .get_json(&format!("/api/letters/{}", Uuid::new_v4()))
            .await;
        assert_eq!(status, 404);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}
