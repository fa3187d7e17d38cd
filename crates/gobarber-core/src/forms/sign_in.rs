use crate::models::Credentials;

use super::{check_email, is_blank, ValidationErrors, PASSWORD_REQUIRED};

#[derive(Debug, Clone, Default)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_email(&mut errors, "email", &self.email);
        if is_blank(&self.password) {
            errors.add("password", PASSWORD_REQUIRED);
        }
        errors.into_result()
    }

    pub fn into_credentials(self) -> Credentials {
        Credentials::new(self.email.trim(), self.password)
    }
}
