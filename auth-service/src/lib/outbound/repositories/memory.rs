use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::identity::errors::AuthError;
use crate::identity::models::Identity;
use crate::identity::models::IdentityId;
use crate::identity::models::Username;
use crate::identity::ports::IdentityRepository;

/// In-memory credential store.
///
/// The identity table is guarded by one RwLock. `create` runs its
/// uniqueness scan and the insert under a single write guard, which
/// serializes racing registrations on the same username or email.
/// Lookups take the read guard and may proceed in parallel.
#[derive(Default)]
pub struct InMemoryIdentityRepository {
    identities: RwLock<HashMap<IdentityId, Identity>>,
}

impl InMemoryIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityRepository for InMemoryIdentityRepository {
    async fn create(&self, identity: Identity) -> Result<Identity, AuthError> {
        let mut identities = self.identities.write().await;

        let taken = identities.values().any(|existing| {
            existing.username == identity.username || existing.email == identity.email
        });
        if taken {
            return Err(AuthError::AlreadyExists);
        }

        identities.insert(identity.id, identity.clone());
        Ok(identity)
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<Identity>, AuthError> {
        let identities = self.identities.read().await;
        Ok(identities
            .values()
            .find(|identity| &identity.username == username)
            .cloned())
    }

    async fn exists(&self, id: &IdentityId) -> Result<bool, AuthError> {
        Ok(self.identities.read().await.contains_key(id))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::identity::models::EmailAddress;

    fn identity(username: &str, email: &str) -> Identity {
        Identity {
            id: IdentityId::new(),
            username: Username::new(username.to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: "$argon2id$test_hash".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repository = InMemoryIdentityRepository::new();

        let created = repository
            .create(identity("testuser", "test@example.com"))
            .await
            .expect("Create failed");

        let found = repository
            .find_by_username(&Username::new("testuser".to_string()).unwrap())
            .await
            .expect("Lookup failed")
            .expect("Identity missing");
        assert_eq!(found.id, created.id);

        assert!(repository.exists(&created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_lookups() {
        let repository = InMemoryIdentityRepository::new();

        let found = repository
            .find_by_username(&Username::new("nobody".to_string()).unwrap())
            .await
            .unwrap();
        assert!(found.is_none());

        assert!(!repository.exists(&IdentityId::new()).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let repository = InMemoryIdentityRepository::new();

        repository
            .create(identity("testuser", "test@example.com"))
            .await
            .expect("Create failed");

        let result = repository
            .create(identity("testuser", "other@example.com"))
            .await;
        assert!(matches!(result, Err(AuthError::AlreadyExists)));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repository = InMemoryIdentityRepository::new();

        repository
            .create(identity("testuser", "test@example.com"))
            .await
            .expect("Create failed");

        let result = repository
            .create(identity("otheruser", "test@example.com"))
            .await;
        assert!(matches!(result, Err(AuthError::AlreadyExists)));
    }

    #[tokio::test]
    async fn test_username_uniqueness_is_case_sensitive() {
        let repository = InMemoryIdentityRepository::new();

        repository
            .create(identity("testuser", "test@example.com"))
            .await
            .expect("Create failed");

        // Exact-match uniqueness: a different casing is a different name
        assert!(repository
            .create(identity("TestUser", "other@example.com"))
            .await
            .is_ok());
    }
}
