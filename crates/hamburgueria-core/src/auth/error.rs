use thiserror::Error;

use crate::api::ApiError;
use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum AuthError {
    /// The handle was never bound to a provider, or its provider is gone
    #[error("SessionHandle must be used within a SessionProvider")]
    NoProvider,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Message for display next to a login form
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Api(e) => e.user_message(),
            AuthError::Storage(e) => format!("Could not save your session: {}", e),
            AuthError::NoProvider => self.to_string(),
        }
    }
}
