//! Client-side session management for Hamburgueria.
//!
//! Signs a user in against the Hamburgueria API, keeps the resulting token
//! and profile in a persistent key-value store, and exposes the current
//! session to the rest of the application through a `SessionHandle`.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod notify;
pub mod storage;

pub use api::{ApiClient, ApiError, Authenticator};
pub use auth::{AuthError, Session, SessionHandle, SessionManager, SessionOptions, SessionProvider};
pub use config::Config;
pub use models::{Credentials, User};
pub use notify::{LogNotifier, Notifier, NotifyError, Toast, ToastStyle};
pub use storage::{FileStore, KeychainStore, KeyValueStore, MemoryStore, StorageError, StoreKind};
