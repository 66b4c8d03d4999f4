//! Seams to the hosted identity provider and document database.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::ProviderError;

/// A JSON object as stored in the document database.
pub type Document = serde_json::Map<String, Value>;

/// The provider's view of a signed-in account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderUser {
    pub uid: String,
    pub email: Option<String>,
}

/// Ambient identity provider (sign-in state persisted by the provider itself).
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Stream of identity changes. The current state is delivered first, then
    /// every later sign-in or sign-out, in order.
    fn subscribe(&self) -> mpsc::UnboundedReceiver<Option<ProviderUser>>;

    fn current_user(&self) -> Option<ProviderUser>;

    /// Create an account and sign it in.
    async fn create_identity(&self, email: &str, password: &str)
    -> Result<ProviderUser, ProviderError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<ProviderUser, ProviderError>;

    async fn sign_out(&self) -> Result<(), ProviderError>;

    /// Re-prove the current user's password before a sensitive change.
    async fn reauthenticate(&self, email: &str, password: &str) -> Result<(), ProviderError>;

    async fn update_password(&self, new_password: &str) -> Result<(), ProviderError>;

    /// Delete the current user's account and sign out.
    async fn delete_identity(&self) -> Result<(), ProviderError>;
}

/// Collection/id keyed document database.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, ProviderError>;

    /// Create or replace.
    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<(), ProviderError>;

    /// Merge `fields` into an existing document. Fails when it does not exist.
    async fn update(&self, collection: &str, id: &str, fields: Document)
    -> Result<(), ProviderError>;

    async fn delete(&self, collection: &str, id: &str) -> Result<(), ProviderError>;

    /// `(id, document)` pairs whose `field` equals `value`.
    async fn query(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<(String, Document)>, ProviderError>;
}
