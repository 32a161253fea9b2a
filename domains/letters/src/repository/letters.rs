//! Postgres letter repository

use sqlx::PgPool;
use uuid::Uuid;

use letterbox_common::Result;

use super::{LetterRepository, StoredLetter};

#[derive(Clone)]
pub struct PgLetterRepository {
    pool: PgPool,
}

impl PgLetterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl LetterRepository for PgLetterRepository {
    async fn create(&self, letter: &StoredLetter) -> Result<StoredLetter> {
        let created = sqlx::query_as::<_, StoredLetter>(
            r#"
            INSERT INTO letters (
                id, recipient_name, sender_name, message,
                theme_color, sender_email, music_id, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, recipient_name, sender_name, message,
                      theme_color, sender_email, music_id, created_at
            "#,
        )
        .bind(letter.id)
        .bind(&letter.recipient_name)
        .bind(&letter.sender_name)
        .bind(&letter.message)
        .bind(&letter.theme_color)
        .bind(&letter.sender_email)
        .bind(&letter.music_id)
        .bind(letter.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find(&self, id: Uuid) -> Result<Option<StoredLetter>> {
        let letter = sqlx::query_as::<_, StoredLetter>(
            r#"
            SELECT id, recipient_name, sender_name, message,
                   theme_color, sender_email, music_id, created_at
            FROM letters
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(letter)
    }
}
