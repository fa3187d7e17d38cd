//! Authentication module for managing the user session.
//!
//! This module provides:
//! - `Session`: the current user and bearer token
//! - `SessionManager`: sign in, sign out and user updates, persisted to a
//!   `KeyValueStore` and applied to the shared `ApiClient`
//!
//! The persisted mirror is two keys per namespace, `<namespace>:token` and
//! `<namespace>:user`, and is read once when the manager is created.

pub mod manager;
pub mod session;

pub use manager::SessionManager;
pub use session::{Session, SessionError, SessionKeys};
