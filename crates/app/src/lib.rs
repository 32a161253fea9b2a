//! Letterbox application composition root
//!
//! Wires the keyed store, letter persistence and sender pool selected by
//! configuration into the domain routers, and composes them into a single
//! application.

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use letterbox_common::{Config, LetterPersistence, StoreBackend};
use letterbox_email::{EmailConfig, EmailServiceFactory, SenderPool};
use letterbox_letters::{
    InMemoryLetterRepository, LetterRepository, LetterStore, LettersState, PgLetterRepository,
    RecordLetterStore, TokenLetterStore,
};
use letterbox_replies::{RepliesState, ReplyLedger};
use letterbox_stats::{StatsState, UsageCounters};
use letterbox_store::{InMemoryStore, KeyValueStore, PgKeyValueStore};

/// Largest request body accepted; letters are capped well below this
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Backends shared by the domain routers
#[derive(Clone)]
pub struct AppServices {
    pub store: Arc<dyn KeyValueStore>,
    pub letters: Arc<dyn LetterStore>,
    pub senders: Arc<SenderPool>,
}

/// Compose all domain routers over the given backends
pub fn build_router(services: AppServices) -> Router {
    let counters = UsageCounters::new(Arc::clone(&services.store));
    let ledger = ReplyLedger::new(
        Arc::clone(&services.store),
        counters.clone(),
        Arc::clone(&services.senders),
    );

    let letters_state = LettersState {
        letters: services.letters,
        counters: counters.clone(),
    };
    let stats_state = StatsState { counters };
    let replies_state = RepliesState {
        ledger: Arc::new(ledger),
    };

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { concat!("Letterbox API v", env!("CARGO_PKG_VERSION")) }),
        )
        .merge(letterbox_letters::routes().with_state(letters_state))
        .merge(letterbox_stats::routes().with_state(stats_state))
        .merge(letterbox_replies::routes().with_state(replies_state))
}

/// Create the main application router from configuration
pub async fn create_app(config: &Config) -> Result<Router, anyhow::Error> {
    let pool = connect_database(config).await?;

    let store: Arc<dyn KeyValueStore> = match (config.store_backend, &pool) {
        (StoreBackend::Postgres, Some(pool)) => Arc::new(PgKeyValueStore::new(pool.clone())),
        (StoreBackend::Postgres, None) => {
            return Err(anyhow::anyhow!("Postgres store requires DATABASE_URL"));
        }
        (StoreBackend::Memory, _) => {
            tracing::warn!("Using in-memory store; replies and counters are lost on restart");
            Arc::new(InMemoryStore::new())
        }
    };

    let letters: Arc<dyn LetterStore> = match config.letter_persistence {
        LetterPersistence::Token => Arc::new(TokenLetterStore::new(&config.app_base_url)),
        LetterPersistence::Record => {
            let repository: Arc<dyn LetterRepository> = match &pool {
                Some(pool) => Arc::new(PgLetterRepository::new(pool.clone())),
                None => {
                    tracing::warn!("Record persistence without DATABASE_URL; letters are kept in memory");
                    Arc::new(InMemoryLetterRepository::new())
                }
            };
            Arc::new(RecordLetterStore::new(&config.app_base_url, repository))
        }
    };

    let email_config = EmailConfig::from_env()?;
    let senders = EmailServiceFactory::create_pool(email_config).await?;

    tracing::info!(
        store = store.backend_name(),
        persistence = ?config.letter_persistence,
        senders = senders.len(),
        selection = ?senders.policy(),
        "Application services ready"
    );

    Ok(build_router(AppServices {
        store,
        letters,
        senders: Arc::new(senders),
    }))
}

/// Connect and migrate when a database is configured
async fn connect_database(config: &Config) -> Result<Option<PgPool>, anyhow::Error> {
    let Some(database_url) = config.database_url.as_deref() else {
        return Ok(None);
    };

    let pool = PgPool::connect(database_url)
        .await
        .map_err(|e| anyhow::anyhow!("Database connection failed: {}", e))?;
    tracing::info!("Database connection established");

    sqlx::migrate!("../../migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(Some(pool))
}

/// CORS layer from a comma-separated origin list; `*` allows any origin
pub fn build_cors_layer(origins: &str) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.trim() == "*" {
        return base.allow_origin(AllowOrigin::any());
    }

    let allowed: Vec<HeaderValue> = origins
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(allowed))
}

/// Request body size limit
pub fn body_limit_layer() -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(MAX_BODY_BYTES)
}

/// Wrap the router in the HTTP layers shared by both binaries.
///
/// The body limit sits outermost: CORS needs a response body with a
/// `Default` impl, which the limit's response body does not provide.
pub fn with_http_layers(app: Router, cors_origins: &str) -> Router {
    app.layer(
        ServiceBuilder::new()
            .layer(body_limit_layer())
            .layer(TraceLayer::new_for_http())
            .layer(build_cors_layer(cors_origins))
            .into_inner(),
    )
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
