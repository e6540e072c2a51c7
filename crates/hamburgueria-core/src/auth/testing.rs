//! Scripted collaborators for session tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::api::{ApiError, Authenticator};
use crate::models::{AuthResponse, Credentials, User};
use crate::notify::{Notifier, NotifyError, Toast};
use crate::storage::{KeyValueStore, MemoryStore, StorageError};

pub fn user() -> User {
    User {
        id: "1".to_string(),
        name: "A".to_string(),
        email: "a@x.com".to_string(),
    }
}

/// Answers every login with the same token, or rejects with 401
pub struct StubAuthenticator {
    token: Option<String>,
    calls: AtomicUsize,
    last_email: Mutex<Option<String>>,
}

impl StubAuthenticator {
    pub fn accepting(token: &str) -> Arc<Self> {
        Arc::new(Self {
            token: Some(token.to_string()),
            calls: AtomicUsize::new(0),
            last_email: Mutex::new(None),
        })
    }

    pub fn rejecting() -> Arc<Self> {
        Arc::new(Self {
            token: None,
            calls: AtomicUsize::new(0),
            last_email: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_email(&self) -> Option<String> {
        self.last_email.lock().unwrap().clone()
    }
}

#[async_trait]
impl Authenticator for StubAuthenticator {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_email.lock().unwrap() = Some(credentials.email.clone());
        match &self.token {
            Some(token) => Ok(AuthResponse {
                access_token: token.clone(),
                user: user(),
            }),
            None => Err(ApiError::Unauthorized),
        }
    }
}

/// Counts toasts, optionally failing each delivery
pub struct RecordingNotifier {
    fail: bool,
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            fail: false,
            messages: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            messages: Mutex::new(Vec::new()),
        })
    }

    pub fn count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    pub fn last_message(&self) -> Option<String> {
        self.messages.lock().unwrap().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, toast: &Toast) -> Result<(), NotifyError> {
        self.messages.lock().unwrap().push(toast.message.clone());
        if self.fail {
            return Err(NotifyError::Display("sink unavailable".to_string()));
        }
        Ok(())
    }
}

/// Memory store whose writes to one key always fail
pub struct FailingStore {
    inner: MemoryStore,
    failing_key: String,
}

impl FailingStore {
    pub fn new(inner: MemoryStore, failing_key: &str) -> Self {
        Self {
            inner,
            failing_key: failing_key.to_string(),
        }
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if key == self.failing_key {
            return Err(StorageError::Io(std::io::Error::other("disk full")));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key)
    }
}
