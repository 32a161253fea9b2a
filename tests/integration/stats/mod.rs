//! Usage counters across the whole flow

use serde_json::json;

use crate::common::TestApp;

mod test_usage_counters {
    use super::*;

    #[tokio::test]
    async fn test_fresh_app_reports_zeroes() {
        let app = TestApp::new();

        let (status, stats) = app.get_json("/api/stats").await;
        assert_eq!(status, 200);
        assert_eq!(
            stats,
            json!({ "letters_created": 0, "letters_opened": 0, "yes_clicks": 0 })
        );
    }

    #[tokio::test]
    async fn test_client_reported_events() {
        let app = TestApp::new();

        for _ in 0..2 {
            let (status, body) = app.post_empty("/api/create").await;
            assert_eq!(status, 200);
            assert_eq!(body, json!({ "success": true }));
        }
        app.post_empty("/api/opened").await;

        let (_, stats) = app.get_json("/api/stats").await;
        assert_eq!(stats["letters_created"], 2);
        assert_eq!(stats["letters_opened"], 1);
        assert_eq!(stats["yes_clicks"], 0);
    }

    #[tokio::test]
    async fn test_full_flow_counts() {
        let app = TestApp::new();

        let created = app
            .create_letter(json!({"to": "Juliet", "from": "Romeo", "message": "Be mine"}))
            .await;
        app.post_empty("/api/opened").await;
        app.post_json(
            "/api/reply",
            json!({"id": created["letterId"], "answer": "yes"}),
        )
        .await;

        let (_, stats) = app.get_json("/api/stats").await;
        assert_eq!(
            stats,
            json!({ "letters_created": 1, "letters_opened": 1, "yes_clicks": 1 })
        );
    }

    #[tokio::test]
    async fn test_counter_outage_is_invisible_to_clients() {
        let app = TestApp::new();
        app.store.set_failing(true);

        let (status, body) = app.post_empty("/api/opened").await;
        assert_eq!(status, 200);
        assert_eq!(body, json!({ "success": true }));

        let (status, stats) = app.get_json("/api/stats").await;
        assert_eq!(status, 200);
        assert_eq!(stats["letters_opened"], 0);

        // Letter creation does not depend on the counter store
        app.create_letter(json!({"to": "A", "from": "B", "message": "C"}))
            .await;
    }
}
