//! Add/edit user form and its client-side checks.
//!
//! Validation failures stay here; they never reach the cache or the API.

use std::fmt;

use thiserror::Error;

use crate::api::{User, UserDraft};
use crate::mutation::MutationError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("'{value}' is not a valid email address")]
    InvalidEmail { value: String },
}

/// Every problem found in one submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

/// Why a form submission did not go through.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Invalid form: {0}")]
    Invalid(#[from] ValidationErrors),

    #[error(transparent)]
    Mutation(#[from] MutationError),
}

impl SubmitError {
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Invalid(errors) => errors.to_string(),
            SubmitError::Mutation(err) => err.user_message(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
}

impl UserForm {
    /// Prefill for editing an existing user.
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            company: user.company.name.clone(),
        }
    }

    /// Check every field and produce the trimmed request body.
    pub fn validate(&self) -> Result<UserDraft, ValidationErrors> {
        let mut errors = Vec::new();
        let fields = [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("company", &self.company),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                errors.push(ValidationError::Required { field });
            }
        }

        let email = self.email.trim();
        if !email.is_empty() && !is_email(email) {
            errors.push(ValidationError::InvalidEmail {
                value: email.to_string(),
            });
        }

        if !errors.is_empty() {
            return Err(ValidationErrors(errors));
        }

        Ok(UserDraft {
            name: self.name.trim().to_string(),
            email: email.to_string(),
            phone: self.phone.trim().to_string(),
            company: self.company.trim().to_string(),
        })
    }
}

/// `local@domain.tld` with no whitespace and exactly one `@`.
fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.split_once('.') {
        Some((host, _)) => !host.is_empty() && !domain.ends_with('.'),
        None => false,
    }
}
