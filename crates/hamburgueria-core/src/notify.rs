//! User-facing notifications.
//!
//! The session manager announces a successful sign-in through a `Notifier`.
//! What the toast says and how it looks is configuration; how it is shown
//! is up to the front-end.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Default welcome message shown after a successful sign-in
pub const DEFAULT_WELCOME_MESSAGE: &str = "Bem-vindo, vamo comer?!";

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Failed to display notification: {0}")]
    Display(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Visual style of a toast, in CSS-like units so web and terminal
/// front-ends can share one config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToastStyle {
    pub border_radius: String,
    pub background: String,
    pub color: String,
}

impl Default for ToastStyle {
    fn default() -> Self {
        Self {
            border_radius: "10px".to_string(),
            background: "#333".to_string(),
            color: "#fff".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Toast {
    pub message: String,
    pub style: ToastStyle,
}

impl Default for Toast {
    fn default() -> Self {
        Self {
            message: DEFAULT_WELCOME_MESSAGE.to_string(),
            style: ToastStyle::default(),
        }
    }
}

/// Sink for success notifications.
///
/// Delivery is best-effort: callers log failures and carry on.
pub trait Notifier: Send + Sync {
    fn success(&self, toast: &Toast) -> Result<(), NotifyError>;
}

/// Notifier that only writes to the log. Used when no front-end is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, toast: &Toast) -> Result<(), NotifyError> {
        info!(message = %toast.message, "Notification");
        Ok(())
    }
}

/// Parse a `#rgb` or `#rrggbb` colour into its components
pub fn parse_hex_color(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
            Some((digit(0)?, digit(1)?, digit(2)?))
        }
        6 => {
            let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            Some((pair(0)?, pair(2)?, pair(4)?))
        }
        _ => None,
    }
}
