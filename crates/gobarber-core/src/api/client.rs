//! API client for communicating with the GoBarber REST API.
//!
//! This module provides the `ApiClient` struct. Every request it issues
//! carries the shared bearer token once one has been set.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, multipart, Client, Method};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::models::{Credentials, ProfileUpdate, SessionResponse, User};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Default HTTP request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

const SESSIONS_PATH: &str = "sessions";
const PROFILE_PATH: &str = "profile";
const AVATAR_PATH: &str = "users/avatar";
const FORGOT_PASSWORD_PATH: &str = "password/forgot";
const RESET_PASSWORD_PATH: &str = "password/reset";

/// Multipart field name the server expects for avatar uploads
const AVATAR_FIELD: &str = "avatar";

#[derive(Debug, Serialize)]
struct ForgotPasswordRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct ResetPasswordRequest<'a> {
    password: &'a str,
    password_confirmation: &'a str,
    token: &'a str,
}

/// API client for GoBarber.
///
/// Clone is cheap: clones share the connection pool and the bearer token,
/// so setting the token through one handle authorizes requests on all of them.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    /// Create a new API client for the given base URL
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.api_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set the bearer token for all subsequent requests
    pub fn set_token(&self, token: impl Into<String>) {
        let mut guard = self.token.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(token.into());
    }

    /// Stop sending an authorization header
    pub fn clear_token(&self) {
        let mut guard = self.token.write().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
    }

    /// The bearer token currently applied to requests
    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = self.token() {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))
                    .context("Bearer token is not a valid header value")?,
            );
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    fn request(&self, method: Method, path: &str) -> Result<reqwest::RequestBuilder> {
        Ok(self
            .client
            .request(method, self.url(path))
            .headers(self.auth_headers()?))
    }

    async fn send(&self, builder: reqwest::RequestBuilder, path: &str) -> Result<reqwest::Response> {
        let response = builder
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send request to {}", path))?;
        debug!(path = path, status = %response.status(), "API response");
        Self::check_response(response).await
    }

    async fn send_json<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let builder = self.request(method, path)?.json(body);
        let response = self.send(builder, path).await?;
        let text = response
            .text()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to read response body from {}", path))?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
            .with_context(|| format!("Failed to parse JSON response from {}", path))
    }

    async fn send_without_reply<B: Serialize>(&self, method: Method, path: &str, body: &B) -> Result<()> {
        let builder = self.request(method, path)?.json(body);
        self.send(builder, path).await?;
        Ok(())
    }

    // ===== Endpoints =====

    /// Authenticate with email and password
    pub async fn create_session(&self, credentials: &Credentials) -> Result<SessionResponse> {
        self.send_json(Method::POST, SESSIONS_PATH, credentials).await
    }

    /// Update name, email and optionally password of the signed-in user
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        self.send_json(Method::PUT, PROFILE_PATH, update).await
    }

    /// Upload a new avatar image for the signed-in user
    pub async fn update_avatar(&self, file_name: &str, bytes: Vec<u8>) -> Result<User> {
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(image_mime_type(file_name))
            .context("Invalid avatar content type")?;
        let form = multipart::Form::new().part(AVATAR_FIELD, part);

        let builder = self.request(Method::PATCH, AVATAR_PATH)?.multipart(form);
        let response = self.send(builder, AVATAR_PATH).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
            .context("Failed to parse avatar response")
    }

    /// Ask the server to email password-recovery instructions
    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        self.send_without_reply(Method::POST, FORGOT_PASSWORD_PATH, &ForgotPasswordRequest { email })
            .await
    }

    /// Set a new password using the token from a recovery email
    pub async fn reset_password(
        &self,
        password: &str,
        password_confirmation: &str,
        token: &str,
    ) -> Result<()> {
        let body = ResetPasswordRequest {
            password,
            password_confirmation,
            token,
        };
        self.send_without_reply(Method::POST, RESET_PASSWORD_PATH, &body)
            .await
    }
}

fn image_mime_type(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
