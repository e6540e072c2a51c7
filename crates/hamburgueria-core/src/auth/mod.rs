//! Authentication module for managing the signed-in session.
//!
//! This module provides:
//! - `Session`: the current identity, `Empty` or `Active`
//! - `SessionManager`: sign-in/sign-out and persistence of the session
//! - `SessionProvider` / `SessionHandle`: the scoped access point the rest
//!   of the application uses
//!
//! Sessions are persisted under `@<namespace>:accessToken` and
//! `@<namespace>:user` and restored when a provider is mounted.

pub mod error;
pub mod manager;
pub mod provider;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use error::AuthError;
pub use manager::{SessionManager, SessionOptions};
pub use provider::{SessionHandle, SessionProvider};
pub use session::{Session, SessionKeys, DEFAULT_NAMESPACE};
