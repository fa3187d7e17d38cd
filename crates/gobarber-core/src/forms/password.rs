use super::{check_email, is_blank, ValidationErrors, CONFIRMATION_MISMATCH, PASSWORD_REQUIRED};

#[derive(Debug, Clone, Default)]
pub struct ForgotPasswordForm {
    pub email: String,
}

impl ForgotPasswordForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_email(&mut errors, "email", &self.email);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResetPasswordForm {
    pub password: String,
    pub password_confirmation: String,
}

impl ResetPasswordForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if is_blank(&self.password) {
            errors.add("password", PASSWORD_REQUIRED);
        }
        if self.password_confirmation != self.password {
            errors.add("password_confirmation", CONFIRMATION_MISMATCH);
        }
        errors.into_result()
    }
}
