//! Data models shared between the API client and the session manager.
//!
//! - `User`: the signed-in identity record, passed through untouched
//! - `Credentials`: transient sign-in input, never persisted
//! - `AuthResponse`: success body of the login endpoint

pub mod user;

pub use user::{AuthResponse, Credentials, User};
