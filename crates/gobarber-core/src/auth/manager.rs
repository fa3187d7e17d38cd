//! Session manager: the current user and bearer token, kept in sync with a
//! persistent store and with the API client's authorization header.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::models::{Credentials, User};
use crate::storage::KeyValueStore;

use super::session::{Session, SessionError, SessionKeys};

pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
    api: ApiClient,
    keys: SessionKeys,
    state: watch::Sender<Session>,
}

impl SessionManager {
    /// Create a manager, hydrating the session from the store.
    ///
    /// When both keys are present the API client is authorized before this
    /// returns. A user entry that does not parse is ignored.
    pub fn new(store: Arc<dyn KeyValueStore>, api: ApiClient, namespace: &str) -> Result<Self> {
        let keys = SessionKeys::new(namespace);
        let session = Self::hydrate(store.as_ref(), &keys)?;

        if let Some(ref token) = session.token {
            api.set_token(token.clone());
        }
        debug!(
            namespace = namespace,
            authenticated = session.is_authenticated(),
            "Session hydrated"
        );

        let (state, _) = watch::channel(session);
        Ok(Self {
            store,
            api,
            keys,
            state,
        })
    }

    fn hydrate(store: &dyn KeyValueStore, keys: &SessionKeys) -> Result<Session> {
        let token = store
            .get(&keys.token)
            .context(SessionError::StorageUnavailable)?;
        let user = store
            .get(&keys.user)
            .context(SessionError::StorageUnavailable)?;

        let (Some(token), Some(user)) = (token, user) else {
            return Ok(Session::default());
        };

        match serde_json::from_str::<User>(&user) {
            Ok(user) => Ok(Session::new(user, token)),
            Err(e) => {
                warn!(key = %keys.user, error = %e, "Ignoring unreadable stored user");
                Ok(Session::default())
            }
        }
    }

    /// Authenticate and persist the resulting session.
    ///
    /// On failure the current session is kept. If the store accepts the token
    /// but not the user, the previous token is put back.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<()> {
        let response = self
            .api
            .create_session(credentials)
            .await
            .context(SessionError::AuthenticationFailed)?;

        let user_json = serde_json::to_string(&response.user)
            .context("Failed to serialize user")?;
        let previous_token = self
            .store
            .get(&self.keys.token)
            .context(SessionError::StorageUnavailable)?;
        self.store
            .set(&self.keys.token, &response.token)
            .context(SessionError::StorageUnavailable)?;
        if let Err(e) = self.store.set(&self.keys.user, &user_json) {
            self.restore_token(previous_token.as_deref());
            return Err(e).context(SessionError::StorageUnavailable);
        }

        self.api.set_token(response.token.clone());
        info!(user_id = %response.user.id, "Signed in");
        self.state
            .send_replace(Session::new(response.user, response.token));
        Ok(())
    }

    /// Put the token key back as it was before a half-written sign-in, so the
    /// stored token never pairs with another user's record.
    fn restore_token(&self, previous: Option<&str>) {
        let restored = match previous {
            Some(token) => self.store.set(&self.keys.token, token),
            None => self.store.remove(&self.keys.token),
        };
        if let Err(e) = restored {
            warn!(key = %self.keys.token, error = %e, "Failed to restore stored token");
        }
    }

    /// Forget the session in memory and in the store.
    ///
    /// Both keys are removed (once each, present or not) and the API client
    /// stops sending the old token. The in-memory session is cleared even
    /// when a removal fails; the first failure is then returned.
    pub fn sign_out(&self) -> Result<()> {
        let token_removed = self.store.remove(&self.keys.token);
        let user_removed = self.store.remove(&self.keys.user);

        self.api.clear_token();
        self.state.send_replace(Session::default());
        info!("Signed out");

        token_removed.context(SessionError::StorageUnavailable)?;
        user_removed.context(SessionError::StorageUnavailable)?;
        Ok(())
    }

    /// Replace the stored user record, keeping the token
    pub fn update_user(&self, user: User) -> Result<()> {
        let user_json = serde_json::to_string(&user).context("Failed to serialize user")?;
        self.store
            .set(&self.keys.user, &user_json)
            .context(SessionError::StorageUnavailable)?;

        self.state.send_modify(|session| {
            if session.token.is_none() {
                debug!(user_id = %user.id, "Updating user without a token");
            }
            session.user = Some(user);
        });
        Ok(())
    }

    /// Snapshot of the current session
    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Receive every replacement of the session
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// The API client this manager authorizes
    pub fn api(&self) -> &ApiClient {
        &self.api
    }
}
