use crate::models::User;

/// Default namespace prefix for persisted keys
pub const DEFAULT_NAMESPACE: &str = "Hamburgueria";

/// The signed-in identity, or its absence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Empty,
    Active { access_token: String, user: User },
}

impl Session {
    pub fn active(access_token: impl Into<String>, user: User) -> Self {
        Session::Active {
            access_token: access_token.into(),
            user,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Session::Active { .. })
    }

    /// Get the bearer token if signed in
    pub fn access_token(&self) -> Option<&str> {
        match self {
            Session::Active { access_token, .. } => Some(access_token),
            Session::Empty => None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Session::Active { user, .. } => Some(user),
            Session::Empty => None,
        }
    }
}

/// Store keys owned by the session manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionKeys {
    pub access_token: String,
    pub user: String,
}

impl SessionKeys {
    /// `@<namespace>:accessToken` and `@<namespace>:user`
    pub fn for_namespace(namespace: &str) -> Self {
        Self {
            access_token: format!("@{}:accessToken", namespace),
            user: format!("@{}:user", namespace),
        }
    }
}

impl Default for SessionKeys {
    fn default() -> Self {
        Self::for_namespace(DEFAULT_NAMESPACE)
    }
}
