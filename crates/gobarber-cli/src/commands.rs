//! Command handlers. Each one builds the session manager from the saved
//! configuration and session, then runs a single flow.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use gobarber_core::account::{self, AccountError};
use gobarber_core::forms::{ForgotPasswordForm, ProfileForm, ResetPasswordForm, SignInForm};
use gobarber_core::models::User;
use gobarber_core::{storage, ApiClient, Config, SessionManager};

use crate::prompt;

fn session_manager() -> Result<SessionManager> {
    let config = Config::load()?;
    let storage_dir = config.storage_dir()?;
    debug!(api_url = %config.api_url, store = ?config.store, "Configuration loaded");

    let store = storage::open(&config, &storage_dir);
    let api = ApiClient::from_config(&config)?;
    SessionManager::new(store, api, &config.namespace).context("Failed to load saved session")
}

fn signed_in_user(manager: &SessionManager) -> Result<User> {
    manager
        .user()
        .ok_or_else(|| anyhow::anyhow!("Not signed in. Run `gobarber login` first."))
}

fn print_user(user: &User) {
    println!("Welcome, {}", user.first_name());
    println!("  Name:   {}", user.name);
    println!("  Email:  {}", user.email);
    if let Some(ref avatar) = user.avatar_url {
        println!("  Avatar: {}", avatar);
    }
}

pub async fn login(email: Option<String>) -> Result<()> {
    let manager = session_manager()?;

    let email = match email {
        Some(email) => email,
        None => prompt::line("Email")?,
    };
    let form = SignInForm {
        email,
        password: prompt::secret("Password")?,
    };
    form.validate().map_err(AccountError::from)?;

    manager.sign_in(&form.into_credentials()).await?;
    let user = signed_in_user(&manager)?;
    println!("Signed in as {} <{}>", user.name, user.email);
    Ok(())
}

pub fn logout() -> Result<()> {
    let manager = session_manager()?;
    manager.sign_out()?;
    println!("Signed out");
    Ok(())
}

pub fn whoami() -> Result<()> {
    let manager = session_manager()?;
    match manager.user() {
        Some(user) => print_user(&user),
        None => println!("Not signed in"),
    }
    Ok(())
}

pub async fn profile(
    name: Option<String>,
    email: Option<String>,
    change_password: bool,
) -> Result<()> {
    let manager = session_manager()?;
    let current = signed_in_user(&manager)?;

    let mut form = ProfileForm {
        name: name.unwrap_or(current.name),
        email: email.unwrap_or(current.email),
        ..Default::default()
    };
    if change_password {
        form.old_password = prompt::secret("Current password")?;
        form.password = prompt::secret("New password")?;
        form.password_confirmation = prompt::secret("Confirm new password")?;
    }

    let user = account::update_profile(&manager, &form).await?;
    println!("Profile updated");
    print_user(&user);
    Ok(())
}

pub async fn avatar(path: &Path) -> Result<()> {
    let manager = session_manager()?;
    signed_in_user(&manager)?;

    let user = account::update_avatar(&manager, path).await?;
    println!("Avatar updated");
    print_user(&user);
    Ok(())
}

pub async fn forgot_password(email: String) -> Result<()> {
    let manager = session_manager()?;
    let form = ForgotPasswordForm { email };

    account::forgot_password(manager.api(), &form).await?;
    println!("Recovery email sent. Follow the instructions in it to reset your password.");
    Ok(())
}

pub async fn reset_password(link: &str) -> Result<()> {
    let manager = session_manager()?;
    // Fail before prompting when the link has no token
    if account::reset_token(link).is_none() {
        return Err(AccountError::MissingResetToken.into());
    }

    let form = ResetPasswordForm {
        password: prompt::secret("New password")?,
        password_confirmation: prompt::secret("Confirm new password")?,
    };
    account::reset_password(manager.api(), &form, link).await?;
    println!("Password reset. You can now sign in with the new password.");
    Ok(())
}
