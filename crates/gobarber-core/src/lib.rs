//! Core library for the GoBarber client.
//!
//! This crate holds everything the front ends share:
//! - `api`: REST client for the GoBarber API with a shared bearer token
//! - `auth`: the session manager (current user and token, persisted across restarts)
//! - `storage`: key/value stores backing the persisted session
//! - `account`: profile, avatar and password-recovery flows
//! - `forms`: validation of user-entered form data
//! - `config`: application configuration

pub mod account;
pub mod api;
pub mod auth;
pub mod config;
pub mod forms;
pub mod models;
pub mod storage;

pub use api::{ApiClient, ApiError};
pub use auth::{Session, SessionError, SessionManager};
pub use config::Config;
pub use models::{Credentials, User};
