//! In-memory identity provider and document store for client tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use catalog_client::error::ProviderError;
use catalog_client::provider::{Document, DocumentStore, IdentityProvider, ProviderUser};
use serde_json::Value;
use tokio::sync::mpsc;

// ── Identity provider ──────────────────────────────────────────────────────

struct Account {
    user: ProviderUser,
    password: String,
}

#[derive(Default)]
struct IdentityState {
    accounts: Vec<Account>,
    current: Option<ProviderUser>,
    subscribers: Vec<mpsc::UnboundedSender<Option<ProviderUser>>>,
    next_uid: u64,
}

impl IdentityState {
    fn emit(&mut self) {
        let current = self.current.clone();
        self.subscribers.retain(|tx| tx.send(current.clone()).is_ok());
    }

    fn account(&self, email: &str) -> Option<&Account> {
        self.accounts
            .iter()
            .find(|a| a.user.email.as_deref() == Some(email))
    }
}

/// Identity provider holding accounts in memory.
///
/// Subscribers receive the current state on subscription unless the provider
/// was built with [`MemoryIdentityProvider::silent`]; then nothing is delivered
/// until [`MemoryIdentityProvider::announce`] or a sign-in state change.
pub struct MemoryIdentityProvider {
    state: Mutex<IdentityState>,
    announce_on_subscribe: bool,
}

impl Default for MemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryIdentityProvider {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(IdentityState::default()),
            announce_on_subscribe: true,
        }
    }

    pub fn silent() -> Self {
        Self {
            announce_on_subscribe: false,
            ..Self::new()
        }
    }

    /// Add an account without signing it in.
    pub fn with_account(self, email: &str, password: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            Self::add_account(&mut state, email, password);
        }
        self
    }

    /// Add an account and make it the current user, as if a previous session
    /// had been restored.
    pub fn signed_in_as(self, email: &str, password: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let user = Self::add_account(&mut state, email, password);
            state.current = Some(user);
        }
        self
    }

    /// Push the current state to every subscriber.
    pub fn announce(&self) {
        self.state.lock().unwrap().emit();
    }

    pub fn password_of(&self, email: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        state.account(email).map(|a| a.password.clone())
    }

    pub fn account_count(&self) -> usize {
        self.state.lock().unwrap().accounts.len()
    }

    fn add_account(state: &mut IdentityState, email: &str, password: &str) -> ProviderUser {
        state.next_uid += 1;
        let user = ProviderUser {
            uid: format!("uid-{}", state.next_uid),
            email: Some(email.to_owned()),
        };
        state.accounts.push(Account {
            user: user.clone(),
            password: password.to_owned(),
        });
        user
    }
}

fn wrong_password() -> ProviderError {
    ProviderError::new("auth/wrong-password", "The password is invalid")
}

fn no_current_user() -> ProviderError {
    ProviderError::new("auth/no-current-user", "No user is signed in")
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    fn subscribe(&self) -> mpsc::UnboundedReceiver<Option<ProviderUser>> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.state.lock().unwrap();
        if self.announce_on_subscribe {
            let _ = tx.send(state.current.clone());
        }
        state.subscribers.push(tx);
        rx
    }

    fn current_user(&self) -> Option<ProviderUser> {
        self.state.lock().unwrap().current.clone()
    }

    async fn create_identity(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderUser, ProviderError> {
        let mut state = self.state.lock().unwrap();
        if state.account(email).is_some() {
            return Err(ProviderError::new(
                "auth/email-already-in-use",
                "The email address is already in use",
            ));
        }
        let user = Self::add_account(&mut state, email, password);
        state.current = Some(user.clone());
        state.emit();
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<ProviderUser, ProviderError> {
        let mut state = self.state.lock().unwrap();
        let user = match state.account(email) {
            None => {
                return Err(ProviderError::new(
                    "auth/user-not-found",
                    "There is no user with this email",
                ));
            }
            Some(account) if account.password != password => return Err(wrong_password()),
            Some(account) => account.user.clone(),
        };
        state.current = Some(user.clone());
        state.emit();
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        let mut state = self.state.lock().unwrap();
        state.current = None;
        state.emit();
        Ok(())
    }

    async fn reauthenticate(&self, email: &str, password: &str) -> Result<(), ProviderError> {
        let state = self.state.lock().unwrap();
        let current = state.current.as_ref().ok_or_else(no_current_user)?;
        match state.account(email) {
            Some(account) if account.user.uid == current.uid && account.password == password => {
                Ok(())
            }
            _ => Err(wrong_password()),
        }
    }

    async fn update_password(&self, new_password: &str) -> Result<(), ProviderError> {
        let mut state = self.state.lock().unwrap();
        let uid = state.current.as_ref().ok_or_else(no_current_user)?.uid.clone();
        if let Some(account) = state.accounts.iter_mut().find(|a| a.user.uid == uid) {
            account.password = new_password.to_owned();
        }
        Ok(())
    }

    async fn delete_identity(&self) -> Result<(), ProviderError> {
        let mut state = self.state.lock().unwrap();
        let uid = state.current.take().ok_or_else(no_current_user)?.uid;
        state.accounts.retain(|a| a.user.uid != uid);
        state.emit();
        Ok(())
    }
}

// ── Document store ─────────────────────────────────────────────────────────

/// Document store keyed by `(collection, id)`.
#[derive(Default)]
pub struct MemoryDocumentStore {
    docs: Mutex<BTreeMap<(String, String), Document>>,
    failure: Mutex<Option<ProviderError>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document directly.
    pub fn insert(&self, collection: &str, id: &str, doc: Value) {
        if let Value::Object(map) = doc {
            self.docs
                .lock()
                .unwrap()
                .insert((collection.to_owned(), id.to_owned()), map);
        }
    }

    pub fn document(&self, collection: &str, id: &str) -> Option<Document> {
        self.docs
            .lock()
            .unwrap()
            .get(&(collection.to_owned(), id.to_owned()))
            .cloned()
    }

    pub fn ids(&self, collection: &str) -> Vec<String> {
        self.docs
            .lock()
            .unwrap()
            .keys()
            .filter(|(c, _)| c == collection)
            .map(|(_, id)| id.clone())
            .collect()
    }

    /// Make every subsequent call fail with `error` (or succeed again with `None`).
    pub fn fail_with(&self, error: Option<ProviderError>) {
        *self.failure.lock().unwrap() = error;
    }

    fn check(&self) -> Result<(), ProviderError> {
        match self.failure.lock().unwrap().clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

fn key(collection: &str, id: &str) -> (String, String) {
    (collection.to_owned(), id.to_owned())
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, ProviderError> {
        self.check()?;
        Ok(self.docs.lock().unwrap().get(&key(collection, id)).cloned())
    }

    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<(), ProviderError> {
        self.check()?;
        self.docs.lock().unwrap().insert(key(collection, id), doc);
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> Result<(), ProviderError> {
        self.check()?;
        let mut docs = self.docs.lock().unwrap();
        let doc = docs
            .get_mut(&key(collection, id))
            .ok_or_else(|| ProviderError::new("not-found", format!("{collection}/{id} not found")))?;
        doc.extend(fields);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), ProviderError> {
        self.check()?;
        self.docs.lock().unwrap().remove(&key(collection, id));
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<(String, Document)>, ProviderError> {
        self.check()?;
        Ok(self
            .docs
            .lock()
            .unwrap()
            .iter()
            .filter(|((c, _), doc)| c == collection && doc.get(field) == Some(value))
            .map(|((_, id), doc)| (id.clone(), doc.clone()))
            .collect())
    }
}
