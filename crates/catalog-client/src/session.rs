//! Client auth session: mirrors the identity provider and runs account flows.
//!
//! One listener task drains the provider subscription in order. It loads the
//! `users/<uid>` profile for every sign-in and publishes the result through a
//! `watch` channel. `ready` becomes true after the first event and stays true.

use std::future::Future;
use std::sync::Arc;

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::error::SessionError;
use crate::provider::{Document, DocumentStore, IdentityProvider, ProviderUser};

pub const USERS_COLLECTION: &str = "users";
pub const PRODUCTS_COLLECTION: &str = "products";
/// Field on product documents holding the owner's uid.
pub const OWNER_FIELD: &str = "userId";

/// Profile document stored at `users/<uid>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub uid: String,
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Profile {
    /// Profile used when the document is missing or unreadable.
    pub fn basic(user: &ProviderUser) -> Self {
        Self {
            uid: user.uid.clone(),
            email: user.email.clone(),
            first_name: String::new(),
            last_name: String::new(),
            phone: None,
        }
    }

    /// Parse a stored document. The document's own `uid` field, if any, is ignored.
    pub fn from_document(uid: &str, mut doc: Document) -> Result<Self, serde_json::Error> {
        doc.insert("uid".to_owned(), Value::String(uid.to_owned()));
        serde_json::from_value(Value::Object(doc))
    }

    pub fn to_document(&self) -> Result<Document, serde_json::Error> {
        to_document(self)
    }

    fn merge(&mut self, update: &ProfileUpdate) {
        if let Some(first_name) = &update.first_name {
            self.first_name = first_name.clone();
        }
        if let Some(last_name) = &update.last_name {
            self.last_name = last_name.clone();
        }
        if let Some(phone) = &update.phone {
            self.phone = Some(phone.clone());
        }
    }
}

/// Partial profile change. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

fn to_document<T: Serialize>(value: &T) -> Result<Document, serde_json::Error> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(serde::ser::Error::custom(format!(
            "expected an object, got {other}"
        ))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No identity event received yet.
    Uninitialized,
    SignedOut,
    SignedIn,
}

/// Observable session snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub identity: Option<Profile>,
    pub ready: bool,
    pub loading: bool,
    pub error: Option<String>,
}

impl SessionState {
    pub fn phase(&self) -> SessionPhase {
        match (self.ready, &self.identity) {
            (false, _) => SessionPhase::Uninitialized,
            (true, None) => SessionPhase::SignedOut,
            (true, Some(_)) => SessionPhase::SignedIn,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

struct Inner {
    provider: Arc<dyn IdentityProvider>,
    store: Arc<dyn DocumentStore>,
    state: Arc<watch::Sender<SessionState>>,
    listener: JoinHandle<()>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

/// Cheap-to-clone handle to the client auth session.
#[derive(Clone)]
pub struct AuthSession {
    inner: Arc<Inner>,
}

impl AuthSession {
    /// Subscribe to `provider` and start the listener task. Must be called
    /// inside a tokio runtime.
    pub fn start(provider: Arc<dyn IdentityProvider>, store: Arc<dyn DocumentStore>) -> Self {
        let (tx, _rx) = watch::channel(SessionState::default());
        let state = Arc::new(tx);
        let events = provider.subscribe();
        let listener = tokio::spawn(listen(events, Arc::clone(&store), Arc::clone(&state)));

        Self {
            inner: Arc::new(Inner {
                provider,
                store,
                state,
                listener,
            }),
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Resolve once the first identity event has been applied.
    pub async fn wait_ready(&self) -> SessionState {
        let mut rx = self.inner.state.subscribe();
        match rx.wait_for(|s| s.ready).await {
            Ok(state) => state.clone(),
            // Sender lives in `inner`, which `self` keeps alive.
            Err(_) => self.snapshot(),
        }
    }

    /// Create the identity, write `users/<uid>` and publish the full profile.
    ///
    /// The provider's sign-in event for the new identity races the document
    /// write. On a multi-threaded runtime the listener may read `users/<uid>`
    /// before it exists and publish the basic profile (empty names) after this
    /// returns; a later [`AuthSession::fetch_profile`] restores the names.
    pub async fn register(&self, input: Registration) -> Result<Profile, SessionError> {
        self.track(async {
            let user = self
                .inner
                .provider
                .create_identity(&input.email, &input.password)
                .await?;
            let profile = Profile {
                uid: user.uid.clone(),
                email: user.email.clone(),
                first_name: input.first_name,
                last_name: input.last_name,
                phone: input.phone,
            };
            self.inner
                .store
                .set(USERS_COLLECTION, &user.uid, profile.to_document()?)
                .await?;
            self.set_identity(Some(profile.clone()));
            tracing::info!(uid = %profile.uid, "registered");
            Ok(profile)
        })
        .await
    }

    /// Sign in. The listener fills in the profile when the provider reports it.
    pub async fn login(&self, email: &str, password: &str) -> Result<ProviderUser, SessionError> {
        self.track(async { Ok(self.inner.provider.sign_in(email, password).await?) })
            .await
    }

    pub async fn logout(&self) -> Result<(), SessionError> {
        self.track(async { Ok(self.inner.provider.sign_out().await?) })
            .await
    }

    /// Reload `users/<uid>`. `None` when signed out or the document is missing.
    pub async fn fetch_profile(&self) -> Result<Option<Profile>, SessionError> {
        let Some(user) = self.inner.provider.current_user() else {
            return Ok(None);
        };
        self.track(async {
            let Some(doc) = self.inner.store.get(USERS_COLLECTION, &user.uid).await? else {
                return Ok(None);
            };
            let profile = Profile::from_document(&user.uid, doc)?;
            self.set_identity(Some(profile.clone()));
            Ok(Some(profile))
        })
        .await
    }

    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<Profile, SessionError> {
        let (user, mut profile) = self.require_identity()?;
        self.track(async {
            self.inner
                .store
                .update(USERS_COLLECTION, &user.uid, to_document(&update)?)
                .await?;
            profile.merge(&update);
            self.set_identity(Some(profile.clone()));
            Ok(profile)
        })
        .await
    }

    /// Re-authenticate with `current`, then set `new_password`.
    pub async fn change_password(&self, current: &str, new_password: &str) -> Result<(), SessionError> {
        let user = self
            .inner
            .provider
            .current_user()
            .ok_or(SessionError::NotAuthenticated)?;
        self.track(async {
            self.reauthenticate(&user, current).await?;
            self.inner.provider.update_password(new_password).await?;
            Ok(())
        })
        .await
    }

    /// Re-authenticate, delete every owned product, the profile document and
    /// finally the identity.
    ///
    /// Not atomic: a failure midway leaves the steps already taken in place.
    pub async fn delete_account(&self, password: &str) -> Result<(), SessionError> {
        let (user, _) = self.require_identity()?;
        self.track(async {
            self.reauthenticate(&user, password).await?;

            let store = &self.inner.store;
            let owned = store
                .query(PRODUCTS_COLLECTION, OWNER_FIELD, &Value::String(user.uid.clone()))
                .await?;
            let count = owned.len();
            try_join_all(
                owned
                    .iter()
                    .map(|(id, _)| store.delete(PRODUCTS_COLLECTION, id)),
            )
            .await?;

            store.delete(USERS_COLLECTION, &user.uid).await?;
            self.inner.provider.delete_identity().await?;
            self.set_identity(None);

            tracing::info!(uid = %user.uid, products = count, "account deleted");
            Ok(())
        })
        .await
    }

    fn require_identity(&self) -> Result<(ProviderUser, Profile), SessionError> {
        let user = self
            .inner
            .provider
            .current_user()
            .ok_or(SessionError::NotAuthenticated)?;
        let profile = self
            .snapshot()
            .identity
            .ok_or(SessionError::NotAuthenticated)?;
        Ok((user, profile))
    }

    async fn reauthenticate(&self, user: &ProviderUser, password: &str) -> Result<(), SessionError> {
        let email = user.email.as_deref().ok_or(SessionError::NotAuthenticated)?;
        self.inner
            .provider
            .reauthenticate(email, password)
            .await
            .map_err(SessionError::ReauthenticationFailed)
    }

    fn set_identity(&self, identity: Option<Profile>) {
        self.inner.state.send_modify(|s| s.identity = identity);
    }

    /// Run `op` with `loading` set, recording its error message on failure.
    async fn track<T>(
        &self,
        op: impl Future<Output = Result<T, SessionError>>,
    ) -> Result<T, SessionError> {
        self.inner.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
        let result = op.await;
        self.inner.state.send_modify(|s| {
            s.loading = false;
            if let Err(e) = &result {
                s.error = Some(e.to_string());
            }
        });
        result
    }
}

async fn listen(
    mut events: mpsc::UnboundedReceiver<Option<ProviderUser>>,
    store: Arc<dyn DocumentStore>,
    state: Arc<watch::Sender<SessionState>>,
) {
    while let Some(event) = events.recv().await {
        let identity = match event {
            Some(user) => Some(load_profile(store.as_ref(), &user).await),
            None => None,
        };
        tracing::debug!(signed_in = identity.is_some(), "identity changed");
        state.send_modify(|s| {
            s.identity = identity;
            s.ready = true;
        });
    }
}

async fn load_profile(store: &dyn DocumentStore, user: &ProviderUser) -> Profile {
    let loaded: Result<Option<Profile>, SessionError> = async {
        match store.get(USERS_COLLECTION, &user.uid).await? {
            Some(doc) => Ok(Some(Profile::from_document(&user.uid, doc)?)),
            None => Ok(None),
        }
    }
    .await;

    match loaded {
        Ok(Some(profile)) => profile,
        Ok(None) => Profile::basic(user),
        Err(e) => {
            tracing::warn!(uid = %user.uid, error = %e, "failed to load profile");
            Profile::basic(user)
        }
    }
}
