//! CLI commands: login, logout, whoami.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use hamburgueria_core::{
    ApiClient, Config, Credentials, Session, SessionHandle, SessionProvider,
};
use tracing::{debug, error, info, warn};

use crate::toast::TerminalNotifier;

/// Mount a provider from config with the terminal notifier attached
pub fn mount(config: &Config) -> Result<SessionProvider> {
    let store = config
        .store
        .open(hamburgueria_core::config::APP_NAME)
        .with_context(|| format!("Failed to open {} store", config.store))?;
    let api = ApiClient::new(config.api_url.clone()).context("Failed to create API client")?;
    debug!(api_url = %api.base_url(), store = %config.store, "Mounting session provider");

    SessionProvider::mount(
        store,
        Arc::new(api),
        Arc::new(TerminalNotifier),
        config.session_options(),
    )
    .context("Failed to restore session")
}

pub async fn login(config: &mut Config, handle: &SessionHandle, email: Option<String>) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => prompt_email(config.last_email.as_deref())?,
    };
    let password = rpassword::prompt_password("Password: ")?;

    if email.is_empty() || password.is_empty() {
        return Err(anyhow::anyhow!("Email and password required"));
    }

    eprintln!("Signing in...");
    let credentials = Credentials::new(email.clone(), password);

    if let Err(e) = handle.sign_in(&credentials).await {
        error!(error = %e, "Login failed");
        return Err(anyhow::anyhow!(e.user_message()));
    }

    config.last_email = Some(email);
    if let Err(e) = config.save() {
        warn!(error = %e, "Failed to save config");
    }

    if let Some(user) = handle.user()? {
        println!("Olá, {}! Signed in as {}", user.first_name(), user.email);
    }
    info!("Login successful");
    Ok(())
}

pub fn logout(handle: &SessionHandle) -> Result<()> {
    let was_active = handle.session()?.is_active();
    handle.sign_out()?;
    if was_active {
        println!("Signed out");
    } else {
        println!("Not signed in");
    }
    Ok(())
}

pub fn whoami(handle: &SessionHandle) -> Result<()> {
    match handle.session()? {
        Session::Active { user, .. } => {
            println!("{} <{}> (id {})", user.name, user.email, user.id);
        }
        Session::Empty => println!("Not signed in"),
    }
    Ok(())
}

fn prompt_email(last_email: Option<&str>) -> Result<String> {
    match last_email {
        Some(last) => print!("Email [{}]: ", last),
        None => print!("Email: "),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    Ok(match (input.is_empty(), last_email) {
        (true, Some(last)) => last.to_string(),
        _ => input.to_string(),
    })
}
