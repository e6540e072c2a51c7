//! Scoped access to the session manager.
//!
//! A `SessionProvider` owns the manager for as long as the application is
//! running. Everything else holds a `SessionHandle`, which only refers to
//! the provider weakly: once the provider is dropped, or for a handle that
//! was never bound, every operation fails with `AuthError::NoProvider`.

use std::sync::{Arc, Weak};

use tokio::sync::watch;
use tracing::warn;

use crate::api::Authenticator;
use crate::models::{Credentials, User};
use crate::notify::Notifier;
use crate::storage::{KeyValueStore, StorageError};

use super::{AuthError, Session, SessionManager, SessionOptions};

pub struct SessionProvider {
    manager: Arc<SessionManager>,
}

impl SessionProvider {
    /// Mount a provider, reading the initial session from `store`
    pub fn mount(
        store: Arc<dyn KeyValueStore>,
        api: Arc<dyn Authenticator>,
        notifier: Arc<dyn Notifier>,
        options: SessionOptions,
    ) -> Result<Self, StorageError> {
        let manager = SessionManager::new(store, api, notifier, options)?;
        Ok(Self::from_manager(manager))
    }

    pub fn from_manager(manager: SessionManager) -> Self {
        Self {
            manager: Arc::new(manager),
        }
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            manager: Arc::downgrade(&self.manager),
        }
    }

    pub fn manager(&self) -> &SessionManager {
        &self.manager
    }
}

/// The application's access point to the current session.
///
/// `SessionHandle::default()` is unbound and always errors.
#[derive(Clone, Default)]
pub struct SessionHandle {
    manager: Weak<SessionManager>,
}

impl SessionHandle {
    fn manager(&self) -> Result<Arc<SessionManager>, AuthError> {
        self.manager.upgrade().ok_or(AuthError::NoProvider)
    }

    /// Whether the provider behind this handle is still mounted
    pub fn is_bound(&self) -> bool {
        self.manager.strong_count() > 0
    }

    pub fn session(&self) -> Result<Session, AuthError> {
        Ok(self.manager()?.session())
    }

    pub fn access_token(&self) -> Result<Option<String>, AuthError> {
        Ok(self.manager()?.access_token())
    }

    pub fn user(&self) -> Result<Option<User>, AuthError> {
        Ok(self.manager()?.user())
    }

    pub fn subscribe(&self) -> Result<watch::Receiver<Session>, AuthError> {
        Ok(self.manager()?.subscribe())
    }

    /// Sign in through the provider.
    ///
    /// The provider is not kept alive while the request is in flight. If it
    /// is dropped before the response arrives, the response is discarded and
    /// nothing is persisted.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<(), AuthError> {
        let api = self.manager()?.authenticator();
        let response = api.login(credentials).await?;

        let manager = self.manager().map_err(|e| {
            warn!("Provider dropped during sign-in, discarding session");
            e
        })?;
        manager.commit(response)
    }

    pub fn sign_out(&self) -> Result<(), AuthError> {
        self.manager()?.sign_out();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use crate::api::ApiError;
    use crate::auth::testing::{user, RecordingNotifier, StubAuthenticator};
    use crate::models::AuthResponse;
    use crate::storage::MemoryStore;

    fn mount(store: &MemoryStore, api: Arc<dyn Authenticator>) -> SessionProvider {
        SessionProvider::mount(
            Arc::new(store.clone()),
            api,
            RecordingNotifier::new(),
            SessionOptions::default(),
        )
        .unwrap()
    }

    /// Holds every login until released
    struct GatedAuthenticator {
        entered: Notify,
        release: Notify,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Authenticator for GatedAuthenticator {
        async fn login(&self, _credentials: &Credentials) -> Result<AuthResponse, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.entered.notify_one();
            self.release.notified().await;
            Ok(AuthResponse {
                access_token: "T1".to_string(),
                user: user(),
            })
        }
    }

    #[test]
    fn test_unbound_handle_fails_loudly() {
        let handle = SessionHandle::default();
        assert!(!handle.is_bound());
        assert!(matches!(handle.session(), Err(AuthError::NoProvider)));
        assert!(matches!(handle.access_token(), Err(AuthError::NoProvider)));
        assert!(matches!(handle.user(), Err(AuthError::NoProvider)));
        assert!(matches!(handle.subscribe(), Err(AuthError::NoProvider)));
        assert!(matches!(handle.sign_out(), Err(AuthError::NoProvider)));
    }

    #[tokio::test]
    async fn test_unbound_handle_sign_in_fails_without_network() {
        let handle = SessionHandle::default();
        let result = handle.sign_in(&Credentials::new("a@x.com", "p")).await;
        assert!(matches!(result, Err(AuthError::NoProvider)));
    }

    #[test]
    fn test_no_provider_message() {
        assert_eq!(
            AuthError::NoProvider.to_string(),
            "SessionHandle must be used within a SessionProvider"
        );
    }

    #[tokio::test]
    async fn test_handle_reads_and_writes_through_provider() {
        let store = MemoryStore::new();
        let provider = mount(&store, StubAuthenticator::accepting("T1"));
        let handle = provider.handle();
        let other = handle.clone();

        handle.sign_in(&Credentials::new("a@x.com", "p")).await.unwrap();

        assert_eq!(other.access_token().unwrap().as_deref(), Some("T1"));
        assert_eq!(other.user().unwrap(), Some(user()));
        assert_eq!(provider.manager().session(), Session::active("T1", user()));

        other.sign_out().unwrap();
        assert_eq!(handle.session().unwrap(), Session::Empty);
    }

    #[tokio::test]
    async fn test_handle_fails_after_provider_dropped() {
        let store = MemoryStore::new();
        let provider = mount(&store, StubAuthenticator::accepting("T1"));
        let handle = provider.handle();
        assert!(handle.is_bound());

        drop(provider);

        assert!(!handle.is_bound());
        assert!(matches!(handle.session(), Err(AuthError::NoProvider)));
        assert!(matches!(handle.sign_out(), Err(AuthError::NoProvider)));
    }

    #[tokio::test]
    async fn test_in_flight_sign_in_discarded_after_unmount() {
        let store = MemoryStore::new();
        let api = Arc::new(GatedAuthenticator {
            entered: Notify::new(),
            release: Notify::new(),
            calls: AtomicUsize::new(0),
        });
        let provider = mount(&store, api.clone());
        let handle = provider.handle();

        let task = tokio::spawn(async move { handle.sign_in(&Credentials::new("a@x.com", "p")).await });

        api.entered.notified().await;
        drop(provider);
        api.release.notify_one();

        let result = task.await.unwrap();
        assert!(matches!(result, Err(AuthError::NoProvider)));
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_subscriber_sees_transitions() {
        let store = MemoryStore::new();
        let provider = mount(&store, StubAuthenticator::accepting("T1"));
        let handle = provider.handle();
        let mut rx = handle.subscribe().unwrap();
        assert_eq!(*rx.borrow(), Session::Empty);

        handle.sign_in(&Credentials::new("a@x.com", "p")).await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_active());

        handle.sign_out().unwrap();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), Session::Empty);
    }
}
