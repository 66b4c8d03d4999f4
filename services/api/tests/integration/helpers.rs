use std::sync::{Arc, Mutex};

use chrono::Utc;

use catalog_api::domain::password::hash_password;
use catalog_api::domain::repository::{OwnedRepository, UserRepository};
use catalog_api::domain::types::{ProfilePatch, User};
use catalog_api::error::ApiError;
use catalog_auth_types::token::JwtSecret;
use catalog_domain::id::UserId;
use catalog_domain::owned::OwnedRecord;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

pub fn test_secret() -> JwtSecret {
    JwtSecret::new(TEST_JWT_SECRET)
}

pub fn test_user(email: &str, password: &str) -> User {
    let now = Utc::now();
    User {
        id: UserId::generate(),
        email: email.to_owned(),
        password_hash: hash_password(password).unwrap(),
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
        phone: None,
        created_at: now,
        updated_at: now,
    }
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns a shared handle to the stored users for post-execution inspection.
    pub fn users_handle(&self) -> Arc<Mutex<Vec<User>>> {
        Arc::clone(&self.users)
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(ApiError::DuplicateEmail);
        }
        users.push(user.clone());
        Ok(())
    }

    async fn update_profile(
        &self,
        id: UserId,
        patch: &ProfilePatch,
    ) -> Result<Option<User>, ApiError> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(first_name) = &patch.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &patch.last_name {
            user.last_name = last_name.clone();
        }
        if let Some(phone) = &patch.phone {
            user.phone = Some(phone.clone());
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }
}

// ── MemoryOwnedRepository ────────────────────────────────────────────────────

/// In-memory owner-scoped store for any [`OwnedRecord`].
pub struct MemoryOwnedRepository<R: OwnedRecord> {
    pub records: Arc<Mutex<Vec<R>>>,
}

impl<R: OwnedRecord> Clone for MemoryOwnedRepository<R> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

impl<R: OwnedRecord> MemoryOwnedRepository<R> {
    pub fn empty() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn records_handle(&self) -> Arc<Mutex<Vec<R>>> {
        Arc::clone(&self.records)
    }
}

impl<R: OwnedRecord> OwnedRepository for MemoryOwnedRepository<R> {
    type Record = R;

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<R>, ApiError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.is_owned_by(owner))
            .cloned()
            .collect())
    }

    async fn find_owned(&self, owner: UserId, id: R::Id) -> Result<Option<R>, ApiError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id() == id && r.is_owned_by(owner))
            .cloned())
    }

    async fn insert(&self, record: &R) -> Result<(), ApiError> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn update_owned(
        &self,
        owner: UserId,
        id: R::Id,
        patch: &R::Patch,
    ) -> Result<Option<R>, ApiError> {
        let mut records = self.records.lock().unwrap();
        let Some(record) = records
            .iter_mut()
            .find(|r| r.id() == id && r.is_owned_by(owner))
        else {
            return Ok(None);
        };
        record.apply_patch(patch, Utc::now());
        Ok(Some(record.clone()))
    }

    async fn delete_owned(&self, owner: UserId, id: R::Id) -> Result<bool, ApiError> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| !(r.id() == id && r.is_owned_by(owner)));
        Ok(records.len() < before)
    }
}
