//! Data models for the GoBarber API.
//!
//! - `User`: the account record returned by the API and kept in the session
//! - `Credentials`: email/password pair sent when signing in

pub mod user;

pub use user::{Credentials, ProfileUpdate, SessionResponse, User};
