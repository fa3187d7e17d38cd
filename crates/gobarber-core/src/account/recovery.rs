use anyhow::{Context, Result};
use reqwest::Url;
use tracing::info;

use crate::api::ApiClient;
use crate::forms::{ForgotPasswordForm, ResetPasswordForm};

use super::AccountError;

const TOKEN_PARAM: &str = "token";

/// Extract the reset token from what the user pasted.
///
/// Accepts the full link from the recovery email, a bare `?token=...`
/// query string, or the token itself. Returns `None` when no token is found.
/// Raw tokens may contain `=` (base64 padding), so only input that starts
/// with `?` or names the `token` parameter is read as a query string.
pub fn reset_token(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let token = if let Ok(url) = Url::parse(input) {
        url.query_pairs()
            .find(|(key, _)| *key == TOKEN_PARAM)
            .map(|(_, value)| value.into_owned())
    } else if input.starts_with('?') || input.contains("token=") {
        input
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == TOKEN_PARAM)
            .map(|(_, value)| value.to_string())
    } else {
        Some(input.to_string())
    };

    token.filter(|t| !t.trim().is_empty())
}

/// Validate the form and ask the server to send recovery instructions
pub async fn forgot_password(api: &ApiClient, form: &ForgotPasswordForm) -> Result<()> {
    form.validate().map_err(AccountError::from)?;

    api.forgot_password(form.email.trim())
        .await
        .context("Failed to request password recovery")?;
    info!("Password recovery email requested");
    Ok(())
}

/// Set a new password with the token from a recovery link.
///
/// A missing token is reported before the form is validated.
pub async fn reset_password(api: &ApiClient, form: &ResetPasswordForm, link: &str) -> Result<()> {
    let token = reset_token(link).ok_or(AccountError::MissingResetToken)?;
    form.validate().map_err(AccountError::from)?;

    api.reset_password(&form.password, &form.password_confirmation, &token)
        .await
        .context("Failed to reset password")?;
    info!("Password reset");
    Ok(())
}
