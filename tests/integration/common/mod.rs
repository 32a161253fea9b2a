//! Common test utilities and fixtures for integration tests
//!
//! Every test builds its own application over fresh in-memory backends, so
//! tests are isolated without a database.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, Response},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use letterbox_app::{build_router, AppServices};
use letterbox_email::mock::MockEmailService;
use letterbox_email::{EmailService, SelectionPolicy, SenderPool};
use letterbox_letters::{
    InMemoryLetterRepository, LetterStore, RecordLetterStore, TokenLetterStore,
};
use letterbox_store::InMemoryStore;

pub const BASE_URL: &str = "https://letters.test";

/// Test application with in-memory backends and captured email
pub struct TestApp {
    pub store: InMemoryStore,
    pub mailers: Vec<MockEmailService>,
    pub letters_repo: Option<InMemoryLetterRepository>,
    router: Router,
}

impl TestApp {
    /// Token persistence, one mock sender identity
    pub fn new() -> Self {
        Self::build(
            vec![MockEmailService::with_sender("cupid@letterbox.test")],
            false,
        )
    }

    /// Record persistence over an in-memory letter repository
    pub fn with_record_persistence() -> Self {
        Self::build(
            vec![MockEmailService::with_sender("cupid@letterbox.test")],
            true,
        )
    }

    /// Token persistence with the given sender identities (possibly none)
    pub fn with_senders(mailers: Vec<MockEmailService>) -> Self {
        Self::build(mailers, false)
    }

    fn build(mailers: Vec<MockEmailService>, record: bool) -> Self {
        let store = InMemoryStore::new();

        let (letters, letters_repo): (Arc<dyn LetterStore>, _) = if record {
            let repo = InMemoryLetterRepository::new();
            (
                Arc::new(RecordLetterStore::new(BASE_URL, Arc::new(repo.clone()))),
                Some(repo),
            )
        } else {
            (Arc::new(TokenLetterStore::new(BASE_URL)), None)
        };

        let senders: Vec<Arc<dyn EmailService>> = mailers
            .iter()
            .cloned()
            .map(|m| Arc::new(m) as Arc<dyn EmailService>)
            .collect();

        let router = build_router(AppServices {
            store: Arc::new(store.clone()),
            letters,
            senders: Arc::new(SenderPool::new(senders, SelectionPolicy::RoundRobin)),
        });

        Self {
            store,
            mailers,
            letters_repo,
            router,
        }
    }

    /// Router for a single request
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// The first mock sender
    pub fn mailer(&self) -> &MockEmailService {
        &self.mailers[0]
    }

    /// Total emails captured across all sender identities
    pub fn sent_count(&self) -> usize {
        self.mailers.iter().map(|m| m.email_count()).sum()
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.send_to(self.router(), request).await
    }

    /// Send through a router wrapped around this app's services
    pub async fn send_to(&self, router: Router, request: Request<Body>) -> Response<Body> {
        router.oneshot(request).await.unwrap()
    }

    /// POST a JSON body and parse the JSON response
    pub async fn post_json(&self, uri: &str, body: Value) -> (u16, Value) {
        let response = self.send(json_request(Method::POST, uri, &body)).await;
        let status = response.status().as_u16();
        (status, parse_body(response).await)
    }

    /// POST without a body and parse the JSON response
    pub async fn post_empty(&self, uri: &str) -> (u16, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = self.send(request).await;
        let status = response.status().as_u16();
        (status, parse_body(response).await)
    }

    /// GET and parse the JSON response
    pub async fn get_json(&self, uri: &str) -> (u16, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = self.send(request).await;
        let status = response.status().as_u16();
        (status, parse_body(response).await)
    }

    /// Create a letter through the API and return the response body
    pub async fn create_letter(&self, body: Value) -> Value {
        let (status, created) = self.post_json("/api/letters", body).await;
        assert_eq!(status, 201, "letter creation failed: {}", created);
        created
    }
}

pub fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Parse response body as JSON Value
pub async fn parse_body(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
