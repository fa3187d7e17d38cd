//! REST API client module for the GoBarber server.
//!
//! This module provides the `ApiClient` for signing in, updating the
//! profile and avatar, and the password-recovery endpoints.
//!
//! The API uses bearer token authentication; the token is obtained from
//! `POST /sessions` and shared by every clone of the client.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
