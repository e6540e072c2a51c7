//! Session manager: the single writer of session state.
//!
//! Holds the current `Session` in a watch channel, mirrors it into the
//! persistent store, and mediates sign-in and sign-out.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::api::Authenticator;
use crate::models::{AuthResponse, Credentials, User};
use crate::notify::{Notifier, Toast};
use crate::storage::{KeyValueStore, StorageError};

use super::{AuthError, Session, SessionKeys, DEFAULT_NAMESPACE};

/// Per-application settings for a session manager
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Prefix for the persisted keys (`@<namespace>:...`)
    pub namespace: String,
    /// Toast shown after a successful sign-in
    pub welcome: Toast,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            welcome: Toast::default(),
        }
    }
}

pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
    api: Arc<dyn Authenticator>,
    notifier: Arc<dyn Notifier>,
    keys: SessionKeys,
    welcome: Toast,
    state: watch::Sender<Session>,
}

impl SessionManager {
    /// Create a manager whose initial session is read from `store`
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        api: Arc<dyn Authenticator>,
        notifier: Arc<dyn Notifier>,
        options: SessionOptions,
    ) -> Result<Self, StorageError> {
        let keys = SessionKeys::for_namespace(&options.namespace);
        let initial = Self::load(&*store, &keys)?;
        debug!(active = initial.is_active(), namespace = %options.namespace, "Session initialized");

        let (state, _) = watch::channel(initial);
        Ok(Self {
            store,
            api,
            notifier,
            keys,
            welcome: options.welcome,
            state,
        })
    }

    /// Read the persisted session.
    ///
    /// Both keys must be present and non-empty. A user record that does not
    /// parse is reported as `MalformedPersistedState`.
    pub fn read_persisted(store: &dyn KeyValueStore, keys: &SessionKeys) -> Result<Session, StorageError> {
        let access_token = store.get(&keys.access_token)?.filter(|t| !t.is_empty());
        let user = store.get(&keys.user)?.filter(|u| !u.is_empty());

        match (access_token, user) {
            (Some(access_token), Some(user)) => {
                let user: User = serde_json::from_str(&user).map_err(|source| {
                    StorageError::MalformedPersistedState {
                        key: keys.user.clone(),
                        source,
                    }
                })?;
                Ok(Session::Active { access_token, user })
            }
            _ => Ok(Session::Empty),
        }
    }

    /// Like `read_persisted`, but a malformed record is cleared and treated
    /// as no session.
    fn load(store: &dyn KeyValueStore, keys: &SessionKeys) -> Result<Session, StorageError> {
        match Self::read_persisted(store, keys) {
            Err(StorageError::MalformedPersistedState { key, source }) => {
                warn!(key = %key, error = %source, "Discarding malformed persisted session");
                store.remove(&keys.access_token)?;
                store.remove(&keys.user)?;
                Ok(Session::Empty)
            }
            other => other,
        }
    }

    pub fn keys(&self) -> &SessionKeys {
        &self.keys
    }

    /// Snapshot of the current session
    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.state.borrow().access_token().map(str::to_string)
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    /// Receiver that observes every session transition
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub(crate) fn authenticator(&self) -> Arc<dyn Authenticator> {
        Arc::clone(&self.api)
    }

    /// Authenticate and, on success, persist and publish the new session.
    ///
    /// Errors from the login request are returned unchanged and leave the
    /// store, the session and the notifier untouched.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<(), AuthError> {
        let response = self.api.login(credentials).await?;
        self.commit(response)
    }

    /// Persist, publish, then notify. Notification failures are logged only.
    pub(crate) fn commit(&self, response: AuthResponse) -> Result<(), AuthError> {
        let AuthResponse { access_token, user } = response;

        self.persist(&access_token, &user)?;

        let user_id = user.id.clone();
        self.state.send_replace(Session::Active { access_token, user });
        info!(user_id = %user_id, "Signed in");

        if let Err(e) = self.notifier.success(&self.welcome) {
            warn!(error = %e, "Failed to show sign-in notification");
        }
        Ok(())
    }

    /// Write both keys, restoring the previous values if either write fails
    fn persist(&self, access_token: &str, user: &User) -> Result<(), StorageError> {
        let user_json = serde_json::to_string(user)?;

        let previous_token = self.store.get(&self.keys.access_token)?;
        let previous_user = self.store.get(&self.keys.user)?;

        let written = self
            .store
            .set(&self.keys.access_token, access_token)
            .and_then(|()| self.store.set(&self.keys.user, &user_json));

        if let Err(e) = written {
            error!(error = %e, "Failed to persist session, restoring previous values");
            self.restore_key(&self.keys.access_token, previous_token);
            self.restore_key(&self.keys.user, previous_user);
            return Err(e);
        }
        Ok(())
    }

    fn restore_key(&self, key: &str, previous: Option<String>) {
        let restored = match previous {
            Some(value) => self.store.set(key, &value),
            None => self.store.remove(key),
        };
        if let Err(e) = restored {
            error!(key, error = %e, "Failed to restore persisted session key");
        }
    }

    /// Clear the persisted keys and the in-memory session. Idempotent.
    pub fn sign_out(&self) {
        for key in [&self.keys.access_token, &self.keys.user] {
            if let Err(e) = self.store.remove(key) {
                warn!(key = %key, error = %e, "Failed to remove persisted session key");
            }
        }

        let previous = self.state.send_replace(Session::Empty);
        if previous.is_active() {
            info!("Signed out");
        } else {
            debug!("Sign-out without an active session");
        }
    }
}
