//! Credential storage: username → password digest.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use logbook_auth::PasswordHash;
use logbook_core::{Entity, Username};

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: Username,
    pub password_hash: PasswordHash,
}

impl Entity for Credential {
    type Id = Username;

    fn id(&self) -> &Self::Id {
        &self.username
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialStoreError {
    #[error("user already exists: {0}")]
    DuplicateUser(Username),
    #[error("user not found: {0}")]
    UserNotFound(Username),
    #[error("storage error: {0}")]
    Storage(String),
}

/// Credential store abstraction.
///
/// At most one credential exists per username. Credentials are never deleted.
pub trait CredentialStore: Send + Sync {
    /// Add a new credential. Fails if the username is taken.
    fn register(
        &self,
        username: Username,
        password_hash: PasswordHash,
    ) -> Result<Credential, CredentialStoreError>;

    fn find_by_username(&self, username: &Username) -> Result<Credential, CredentialStoreError>;

    /// Replace the digest of an existing credential.
    fn update_password(
        &self,
        username: &Username,
        new_hash: PasswordHash,
    ) -> Result<Credential, CredentialStoreError>;
}

impl<S> CredentialStore for Arc<S>
where
    S: CredentialStore + ?Sized,
{
    fn register(
        &self,
        username: Username,
        password_hash: PasswordHash,
    ) -> Result<Credential, CredentialStoreError> {
        (**self).register(username, password_hash)
    }

    fn find_by_username(&self, username: &Username) -> Result<Credential, CredentialStoreError> {
        (**self).find_by_username(username)
    }

    fn update_password(
        &self,
        username: &Username,
        new_hash: PasswordHash,
    ) -> Result<Credential, CredentialStoreError> {
        (**self).update_password(username, new_hash)
    }
}

/// In-memory credential store.
///
/// Lives as long as the process. All writes go through one `RwLock`, so two
/// concurrent resets of the same account cannot interleave.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    inner: RwLock<HashMap<Username, Credential>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> CredentialStoreError {
    CredentialStoreError::Storage("lock poisoned".to_string())
}

impl CredentialStore for InMemoryCredentialStore {
    fn register(
        &self,
        username: Username,
        password_hash: PasswordHash,
    ) -> Result<Credential, CredentialStoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        if map.contains_key(&username) {
            return Err(CredentialStoreError::DuplicateUser(username));
        }

        let credential = Credential {
            username: username.clone(),
            password_hash,
        };
        map.insert(username, credential.clone());
        Ok(credential)
    }

    fn find_by_username(&self, username: &Username) -> Result<Credential, CredentialStoreError> {
        let map = self.inner.read().map_err(poisoned)?;
        map.get(username)
            .cloned()
            .ok_or_else(|| CredentialStoreError::UserNotFound(username.clone()))
    }

    fn update_password(
        &self,
        username: &Username,
        new_hash: PasswordHash,
    ) -> Result<Credential, CredentialStoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        let credential = map
            .get_mut(username)
            .ok_or_else(|| CredentialStoreError::UserNotFound(username.clone()))?;
        credential.password_hash = new_hash;
        Ok(credential.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> Username {
        Username::parse(s).unwrap()
    }

    fn digest(s: &str) -> PasswordHash {
        PasswordHash::from_stored(s)
    }

    #[test]
    fn register_then_find() {
        let store = InMemoryCredentialStore::new();
        let created = store.register(name("alice"), digest("h1")).unwrap();
        assert_eq!(created.id(), &name("alice"));

        let found = store.find_by_username(&name("alice")).unwrap();
        assert_eq!(found, created);
    }

    #[test]
    fn duplicate_registration_is_rejected_and_keeps_original() {
        let store = InMemoryCredentialStore::new();
        store.register(name("alice"), digest("h1")).unwrap();

        let err = store.register(name("alice"), digest("h2")).unwrap_err();
        assert_eq!(err, CredentialStoreError::DuplicateUser(name("alice")));
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.find_by_username(&name("alice")).unwrap().password_hash,
            digest("h1")
        );
    }

    #[test]
    fn unknown_user_is_not_found() {
        let store = InMemoryCredentialStore::new();
        assert!(store.is_empty());
        assert_eq!(
            store.find_by_username(&name("ghost")),
            Err(CredentialStoreError::UserNotFound(name("ghost")))
        );
        assert_eq!(
            store.update_password(&name("ghost"), digest("h")),
            Err(CredentialStoreError::UserNotFound(name("ghost")))
        );
    }

    #[test]
    fn update_password_replaces_digest_in_place() {
        let store = InMemoryCredentialStore::new();
        store.register(name("alice"), digest("h1")).unwrap();

        let updated = store.update_password(&name("alice"), digest("h2")).unwrap();
        assert_eq!(updated.password_hash, digest("h2"));
        assert_eq!(
            store.find_by_username(&name("alice")).unwrap().password_hash,
            digest("h2")
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn concurrent_registrations_of_one_name_admit_exactly_one() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    store.register(name("alice"), digest(&format!("h{i}"))).is_ok()
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(winners, 1);
        assert_eq!(store.len(), 1);
    }
}
