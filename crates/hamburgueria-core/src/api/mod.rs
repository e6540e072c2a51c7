//! REST API client module for the Hamburgueria backend.
//!
//! The backend exposes a single authentication endpoint, `POST /login`,
//! which exchanges an email/password pair for a bearer token and the
//! signed-in user's profile.

pub mod client;
pub mod error;

pub use client::{ApiClient, Authenticator};
pub use error::ApiError;
