//! Reply submission and status checks through the composed router

use serde_json::{json, Value};
use tower::ServiceExt;

use letterbox_email::mock::MockEmailService;

use crate::common::{json_request, parse_body, TestApp};

async fn letter_id(app: &TestApp, sender_email: &str) -> String {
    let created = app
        .create_letter(json!({
            "to": "Juliet",
            "from": "Romeo",
            "message": "Will you be my valentine?",
            "senderEmail": sender_email
        }))
        .await;
    created["letterId"].as_str().unwrap().to_string()
}

fn reply(id: &str, answer: &str) -> Value {
    json!({
        "id": id,
        "answer": answer,
        "message": "<b>obviously</b>",
        "senderEmail": "romeo@example.com",
        "recipientName": "Juliet"
    })
}

mod test_submit_reply {
    use super::*;

    #[test_log::test(tokio::test)]
    async fn test_reply_notifies_sender_once() {
        let app = TestApp::new();
        let id = letter_id(&app, "romeo@example.com").await;

        let (status, body) = app.post_json("/api/reply", reply(&id, "Yes")).await;
        assert_eq!(status, 200);
        assert_eq!(body, json!({ "success": true }));

        let emails = app.mailer().get_emails_for_recipient("romeo@example.com");
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].message.subject, "💌 Juliet replied: Yes!");
        assert_eq!(emails[0].answer(), Some("yes"));
        let html = emails[0].message.body_html.as_deref().unwrap();
        assert!(html.contains("&lt;b&gt;obviously"));
        assert!(!html.contains("<b>obviously"));

        let (_, status) = app.get_json(&format!("/api/check?id={}", id)).await;
        assert_eq!(status, json!({ "replied": true, "answer": "yes" }));
    }

    #[test_log::test(tokio::test)]
    async fn test_duplicate_reply_keeps_first_answer() {
        let app = TestApp::new();
        let id = letter_id(&app, "romeo@example.com").await;

        app.post_json("/api/reply", reply(&id, "no")).await;
        let (status, body) = app.post_json("/api/reply", reply(&id, "yes")).await;

        assert_eq!(status, 200);
        assert_eq!(body, json!({ "success": true }));
        assert_eq!(app.sent_count(), 1);
        assert_eq!(app.store.entry_count(), 1);

        let (_, status) = app.get_json(&format!("/api/check?id={}", id)).await;
        assert_eq!(status["answer"], "no");

        let (_, stats) = app.get_json("/api/stats").await;
        assert_eq!(stats["yes_clicks"], 0);
    }

    #[tokio::test]
    async fn test_concurrent_replies_send_one_email() {
        let app = TestApp::new();
        let id = letter_id(&app, "romeo@example.com").await;

        let mut handles = Vec::new();
        for i in 0..12 {
            let router = app.router();
            let request = json_request(
                axum::http::Method::POST,
                "/api/reply",
                &reply(&id, if i % 2 == 0 { "yes" } else { "no" }),
            );
            handles.push(tokio::spawn(async move {
                let response = router.oneshot(request).await.unwrap();
                parse_body(response).await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), json!({ "success": true }));
        }

        assert_eq!(app.sent_count(), 1);
        assert_eq!(app.store.entry_count(), 1);
    }

    #[tokio::test]
    async fn test_reply_without_id_is_never_deduplicated() {
        let app = TestApp::new();

        for _ in 0..3 {
            let (_, body) = app
                .post_json(
                    "/api/reply",
                    json!({"answer": "yes", "senderEmail": "romeo@example.com", "recipientName": "Juliet"}),
                )
                .await;
            assert_eq!(body["success"], true);
        }

        assert_eq!(app.sent_count(), 3);
        assert_eq!(app.store.entry_count(), 0);
        let (_, stats) = app.get_json("/api/stats").await;
        assert_eq!(stats["yes_clicks"], 3);
    }

    #[tokio::test]
    async fn test_reply_without_sender_email_records_silently() {
        let app = TestApp::new();
        let id = letter_id(&app, "").await;

        let (_, body) = app
            .post_json("/api/reply", json!({"letterId": id, "answer": "yes", "senderEmail": ""}))
            .await;
        assert_eq!(body, json!({ "success": true }));
        assert_eq!(app.sent_count(), 0);

        let (_, status) = app.get_json(&format!("/api/check?id={}", id)).await;
        assert_eq!(status["replied"], true);
    }

    #[tokio::test]
    async fn test_notification_failure_keeps_reply() {
        let app = TestApp::with_senders(vec![MockEmailService::failing()]);
        let id = letter_id(&app, "romeo@example.com").await;

        let (status, body) = app.post_json("/api/reply", reply(&id, "yes")).await;
        assert_eq!(status, 200);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "NOTIFICATION_FAILED");

        let (_, status) = app.get_json(&format!("/api/check?id={}", id)).await;
        assert_eq!(status, json!({ "replied": true, "answer": "yes" }));

        // The recipient retrying is treated as a duplicate, not a second send
        let (_, body) = app.post_json("/api/reply", reply(&id, "yes")).await;
        assert_eq!(body, json!({ "success": true }));
    }

    #[tokio::test]
    async fn test_empty_sender_pool_reports_failure() {
        let app = TestApp::with_senders(vec![]);
        let id = letter_id(&app, "romeo@example.com").await;

        let (status, body) = app.post_json("/api/reply", reply(&id, "no")).await;
        assert_eq!(status, 200);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "NO_NOTIFICATION_IDENTITY");

        let (_, status) = app.get_json(&format!("/api/check?id={}", id)).await;
        assert_eq!(status, json!({ "replied": true, "answer": "no" }));
    }

    #[tokio::test]
    async fn test_store_outage_reports_failure_without_email() {
        let app = TestApp::new();
        app.store.set_failing(true);

        let (status, body) = app.post_json("/api/reply", reply("L-outage", "yes")).await;
        assert_eq!(status, 200);
        assert_eq!(body["error"]["code"], "STORE_UNAVAILABLE");
        assert_eq!(app.sent_count(), 0);

        let (status, body) = app.get_json("/api/check?id=L-outage").await;
        assert_eq!(status, 200);
        assert_eq!(body, json!({ "replied": false }));
    }

    #[tokio::test]
    async fn test_round_robin_across_identities() {
        let app = TestApp::with_senders(vec![
            MockEmailService::with_sender("one@letterbox.test"),
            MockEmailService::with_sender("two@letterbox.test"),
        ]);

        for n in 0..4 {
            app.post_json("/api/reply", reply(&format!("letter-{}", n), "yes"))
                .await;
        }

        assert_eq!(app.mailers[0].email_count(), 2);
        assert_eq!(app.mailers[1].email_count(), 2);
        assert_eq!(
            app.mailers[1].get_all_emails()[0].message.from,
            "two@letterbox.test"
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let app = TestApp::new();
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/api/reply")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{\"id\": "))
            .unwrap();

        let response = app.send(request).await;
        assert_eq!(response.status(), 400);
    }
}

mod test_check_reply {
    use super::*;

    #[tokio::test]
    async fn test_unknown_letter_not_replied() {
        let app = TestApp::new();
        let (status, body) = app.get_json("/api/check?id=never-answered").await;
        assert_eq!(status, 200);
        assert_eq!(body, json!({ "replied": false }));
    }

    #[tokio::test]
    async fn test_missing_id_is_bad_request() {
        let app = TestApp::new();

        let (status, body) = app.get_json("/api/check").await;
        assert_eq!(status, 400);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (status, _) = app.get_json("/api/check?id=").await;
        assert_eq!(status, 400);
    }
}
