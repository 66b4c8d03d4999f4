/// Failure reported by an identity provider or document store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ProviderError {
    /// Provider-specific code, e.g. `auth/wrong-password`.
    pub code: String,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Errors returned by [`crate::session::AuthSession`] operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("No authenticated user")]
    NotAuthenticated,
    #[error("{0}")]
    ReauthenticationFailed(ProviderError),
    #[error("{0}")]
    Provider(#[from] ProviderError),
    #[error("malformed profile document: {0}")]
    MalformedProfile(#[from] serde_json::Error),
}
