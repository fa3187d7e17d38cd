//! Validation of user-entered form data.
//!
//! Every form validates all of its fields in one pass and reports the
//! failures as `ValidationErrors`, a map from field name to the first
//! message for that field.

pub mod password;
pub mod profile;
pub mod sign_in;

use std::collections::BTreeMap;
use std::fmt;

pub use password::{ForgotPasswordForm, ResetPasswordForm};
pub use profile::ProfileForm;
pub use sign_in::SignInForm;

pub(crate) const EMAIL_REQUIRED: &str = "Email is required";
pub(crate) const EMAIL_INVALID: &str = "Enter a valid email address";
pub(crate) const PASSWORD_REQUIRED: &str = "Password is required";
pub(crate) const FIELD_REQUIRED: &str = "This field is required";
pub(crate) const CONFIRMATION_MISMATCH: &str = "Passwords do not match";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure. Only the first message per field is kept.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, msg)| format!("{}: {}", field, msg))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Loose structural check: `local@domain.tld`, no whitespace
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

/// Required + well-formed email check shared by several forms
pub(crate) fn check_email(errors: &mut ValidationErrors, field: &'static str, email: &str) {
    if is_blank(email) {
        errors.add(field, EMAIL_REQUIRED);
    } else if !is_valid_email(email) {
        errors.add(field, EMAIL_INVALID);
    }
}
