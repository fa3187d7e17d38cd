use thiserror::Error;

use crate::models::User;

/// Suffix of the store key holding the raw bearer token
const TOKEN_KEY_SUFFIX: &str = "token";

/// Suffix of the store key holding the serialized user
const USER_KEY_SUFFIX: &str = "user";

/// Failure kinds surfaced by the session manager.
///
/// These are attached as context over the underlying error, so callers can
/// `downcast_ref::<SessionError>()` for the kind and still reach the root
/// cause (`ApiError`, `StorageError`) through the chain.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Session storage unavailable")]
    StorageUnavailable,
}

/// The signed-in user and their bearer token.
///
/// Both are present or both are absent, with one tolerated exception:
/// `SessionManager::update_user` on an empty session sets only the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
}

impl Session {
    pub fn new(user: User, token: String) -> Self {
        Self {
            user: Some(user),
            token: Some(token),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }
}

/// The two store keys of one namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionKeys {
    pub token: String,
    pub user: String,
}

impl SessionKeys {
    pub fn new(namespace: &str) -> Self {
        Self {
            token: format!("{}:{}", namespace, TOKEN_KEY_SUFFIX),
            user: format!("{}:{}", namespace, USER_KEY_SUFFIX),
        }
    }
}
