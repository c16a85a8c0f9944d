//! In-memory identity store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use taskgate_core::error::AppError;
use taskgate_core::result::AppResult;
use taskgate_core::traits::IdentityStore;
use taskgate_core::types::{Identity, NewIdentity, StoredCredential};

/// Identities keyed by id, with case-insensitive email uniqueness.
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    records: RwLock<HashMap<Uuid, StoredCredential>>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Identity>> {
        Ok(self
            .records
            .read()
            .await
            .get(&id)
            .map(|r| r.identity.clone()))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<StoredCredential>> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .find(|r| r.identity.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create(&self, fields: NewIdentity) -> AppResult<Identity> {
        let mut records = self.records.write().await;
        if records
            .values()
            .any(|r| r.identity.email.eq_ignore_ascii_case(&fields.email))
        {
            return Err(AppError::conflict("Email is already registered"));
        }

        let now = Utc::now();
        let identity = Identity {
            id: Uuid::new_v4(),
            name: fields.name,
            email: fields.email,
            role: fields.role,
            created_at: now,
            updated_at: now,
        };
        records.insert(
            identity.id,
            StoredCredential {
                identity: identity.clone(),
                credential_hash: fields.credential_hash,
            },
        );
        Ok(identity)
    }

    async fn list(&self) -> AppResult<Vec<Identity>> {
        let mut all: Vec<Identity> = self
            .records
            .read()
            .await
            .values()
            .map(|r| r.identity.clone())
            .collect();
        all.sort_by_key(|i| i.created_at);
        Ok(all)
    }
}
