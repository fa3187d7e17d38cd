use crate::models::ProfileUpdate;

use super::{check_email, is_blank, ValidationErrors, CONFIRMATION_MISMATCH, FIELD_REQUIRED};

const NAME_REQUIRED: &str = "Name is required";

/// Profile edit form. Leaving `old_password` empty keeps the current password.
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    pub old_password: String,
    pub password: String,
    pub password_confirmation: String,
}

impl ProfileForm {
    fn changes_password(&self) -> bool {
        !self.old_password.is_empty()
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if is_blank(&self.name) {
            errors.add("name", NAME_REQUIRED);
        }
        check_email(&mut errors, "email", &self.email);

        if self.changes_password() {
            if is_blank(&self.password) {
                errors.add("password", FIELD_REQUIRED);
            }
            if is_blank(&self.password_confirmation) {
                errors.add("password_confirmation", FIELD_REQUIRED);
            }
        }
        if self.password_confirmation != self.password {
            errors.add("password_confirmation", CONFIRMATION_MISMATCH);
        }

        errors.into_result()
    }

    /// Request body; password fields are only included when changing the password
    pub fn to_update(&self) -> ProfileUpdate {
        let (old_password, password, password_confirmation) = if self.changes_password() {
            (
                Some(self.old_password.clone()),
                Some(self.password.clone()),
                Some(self.password_confirmation.clone()),
            )
        } else {
            (None, None, None)
        };

        ProfileUpdate {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            old_password,
            password,
            password_confirmation,
        }
    }
}
