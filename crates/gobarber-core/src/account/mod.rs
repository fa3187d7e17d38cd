//! Account flows built on the session manager and the API client.
//!
//! - `profile`: update name/email/password and upload an avatar; the
//!   returned user replaces the one held by the `SessionManager`
//! - `recovery`: forgot-password and reset-password requests
//!
//! Each flow validates its form before touching the network.

pub mod profile;
pub mod recovery;

use thiserror::Error;

use crate::forms::ValidationErrors;

pub use profile::{update_avatar, update_profile};
pub use recovery::{forgot_password, reset_password, reset_token};

#[derive(Error, Debug)]
pub enum AccountError {
    #[error("Invalid form: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Missing password reset token")]
    MissingResetToken,
}
