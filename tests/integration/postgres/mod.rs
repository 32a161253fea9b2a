//! Postgres backends, run only when `TEST_DATABASE_URL` is set
//!
//! Keys and ids are unique per test run so the suite can share one database.

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use letterbox_letters::repository::StoredLetter;
use letterbox_letters::{LetterRecord, LetterRepository, PgLetterRepository, Theme};
use letterbox_store::{KeyValueStore, PgKeyValueStore};

/// Connect and migrate, or `None` when no test database is configured
async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping Postgres test");
        return None;
    };

    let pool = PgPool::connect(&database_url)
        .await
        .expect("connect to TEST_DATABASE_URL");
    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .expect("run migrations");
    Some(pool)
}

fn unique(prefix: &str) -> String {
    format!("{}:{}", prefix, Uuid::new_v4().simple())
}

mod test_pg_key_value_store {
    use super::*;

    #[tokio::test]
    async fn test_first_writer_wins() {
        let Some(pool) = test_pool().await else { return };
        let store = PgKeyValueStore::new(pool);
        let key = unique("reply");

        assert_eq!(store.get(&key).await.unwrap(), None);
        assert_eq!(store.set_if_absent(&key, "no").await.unwrap(), None);
        assert_eq!(
            store.set_if_absent(&key, "yes").await.unwrap(),
            Some("no".to_string())
        );
        assert_eq!(store.get(&key).await.unwrap(), Some("no".to_string()));
    }

    #[tokio::test]
    async fn test_concurrent_writers_single_winner() {
        let Some(pool) = test_pool().await else { return };
        let store = Arc::new(PgKeyValueStore::new(pool));
        let key = unique("reply");

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            let key = key.clone();
            handles.push(tokio::spawn(async move {
                let value = if i % 2 == 0 { "yes" } else { "no" };
                store.set_if_absent(&key, value).await.unwrap()
            }));
        }

        let mut winners = 0;
        let mut seen = Vec::new();
        for handle in handles {
            match handle.await.unwrap() {
                None => winners += 1,
                Some(existing) => seen.push(existing),
            }
        }

        assert_eq!(winners, 1);
        let stored = store.get(&key).await.unwrap().unwrap();
        assert!(seen.iter().all(|existing| *existing == stored));
    }

    #[tokio::test]
    async fn test_incr_upserts_counter() {
        let Some(pool) = test_pool().await else { return };
        let store = PgKeyValueStore::new(pool);
        let name = unique("val_test");

        assert_eq!(store.counter(&name).await.unwrap(), None);
        assert_eq!(store.incr(&name).await.unwrap(), 1);
        assert_eq!(store.incr(&name).await.unwrap(), 2);
        assert_eq!(store.counter(&name).await.unwrap(), Some(2));
    }
}

mod test_pg_letter_repository {
    use super::*;

    #[tokio::test]
    async fn test_create_and_find() {
        let Some(pool) = test_pool().await else { return };
        let repository = PgLetterRepository::new(pool);

        let record = LetterRecord::new(
            "Juliet".to_string(),
            "Romeo".to_string(),
            "Two households, both alike in dignity".to_string(),
            Theme::Purple,
            "romeo@example.com".to_string(),
            Some("dQw4w9WgXcQ".to_string()),
        )
        .unwrap();
        let row = StoredLetter::new(&record);

        let created = repository.create(&row).await.unwrap();
        assert_eq!(created.id, row.id);

        let found = repository.find(row.id).await.unwrap().unwrap();
        assert_eq!(found.into_record(), record);

        assert!(repository.find(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_id_is_database_error() {
        let Some(pool) = test_pool().await else { return };
        let repository = PgLetterRepository::new(pool);

        let record = LetterRecord::new(
            "A".to_string(),
            "B".to_string(),
            "C".to_string(),
            Theme::Pink,
            String::new(),
            None,
        )
        .unwrap();
        let row = StoredLetter::new(&record);

        repository.create(&row).await.unwrap();
        let err = repository.create(&row).await.unwrap_err();
        assert!(matches!(err, letterbox_common::Error::Database(_)));
    }
}
