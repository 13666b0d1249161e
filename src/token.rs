use parking_lot::RwLock;

/// Error type for bearer-token lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// No session token is available.
    #[error("authentication token is missing")]
    Missing,
}

/// Synchronous access to the current session's bearer token.
pub trait TokenProvider: Send + Sync {
    /// Returns a non-empty bearer token.
    ///
    /// # Errors
    /// Returns `TokenError::Missing` when there is no session.
    fn bearer_token(&self) -> Result<String, TokenError>;
}

/// Session token store shared by everything that talks to the backend.
#[derive(Debug, Default)]
pub struct SessionTokens {
    token: RwLock<Option<String>>,
}

impl SessionTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }

    pub fn set(&self, token: impl Into<String>) {
        *self.token.write() = Some(token.into());
    }

    pub fn clear(&self) {
        self.token.write().take();
    }
}

impl TokenProvider for SessionTokens {
    fn bearer_token(&self) -> Result<String, TokenError> {
        self.token
            .read()
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(ToOwned::to_owned)
            .ok_or(TokenError::Missing)
    }
}
