//! In-memory letter repository for tests and local development

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use letterbox_common::{Error, Result};

use super::{LetterRepository, StoredLetter};

#[derive(Clone, Default)]
pub struct InMemoryLetterRepository {
    letters: Arc<Mutex<HashMap<Uuid, StoredLetter>>>,
}

impl InMemoryLetterRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.letters.lock().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl LetterRepository for InMemoryLetterRepository {
    async fn create(&self, letter: &StoredLetter) -> Result<StoredLetter> {
        let mut letters = self
            .letters
            .lock()
            .map_err(|e| Error::Internal(format!("Lock error: {}", e)))?;

        if letters.contains_key(&letter.id) {
            return Err(Error::Internal(format!("Duplicate letter id {}", letter.id)));
        }
        letters.insert(letter.id, letter.clone());
        Ok(letter.clone())
    }

    async fn find(&self, id: Uuid) -> Result<Option<StoredLetter>> {
        let letters = self
            .letters
            .lock()
            .map_err(|e| Error::Internal(format!("Lock error: {}", e)))?;
        Ok(letters.get(&id).cloned())
    }
}
