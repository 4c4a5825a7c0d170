//! Field validation shared by the login and sign-up actions.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use utoipa::ToSchema;

pub const MIN_PASSWORD_LENGTH: usize = 8;

pub const EMAIL_INVALID: &str = "Email is invalid";
pub const PASSWORD_REQUIRED: &str = "Password is required";
pub const PASSWORD_TOO_SHORT: &str = "Password is too short";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const EMAIL_TAKEN: &str = "A user already exists with this email";

/// Basic email format check.
#[must_use]
pub fn valid_email(email: &str) -> bool {
    static EMAIL_RE: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL_RE
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(email))
}

/// Per-field messages rendered next to the inputs. Missing entries serialize as `null`.
#[derive(ToSchema, Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl FieldErrors {
    #[must_use]
    pub fn email(message: &str) -> Self {
        Self {
            email: Some(message.to_string()),
            password: None,
        }
    }

    #[must_use]
    pub fn password(message: &str) -> Self {
        Self {
            email: None,
            password: Some(message.to_string()),
        }
    }
}

/// Body of a `400` answer from the login and sign-up actions.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ActionErrors {
    pub errors: FieldErrors,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Validate in order: email pattern, password present, password length.
///
/// # Errors
/// Returns the first failing field's message.
pub fn validate_credentials(
    email: Option<&str>,
    password: Option<&str>,
) -> Result<Credentials, FieldErrors> {
    let Some(email) = email.filter(|email| valid_email(email)) else {
        return Err(FieldErrors::email(EMAIL_INVALID));
    };

    let Some(password) = password else {
        return Err(FieldErrors::password(PASSWORD_REQUIRED));
    };

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(FieldErrors::password(PASSWORD_TOO_SHORT));
    }

    Ok(Credentials {
        email: email.to_string(),
        password: password.to_string(),
    })
}

/// Checkbox semantics: only the literal `on` counts.
#[must_use]
pub fn remember_flag(value: Option<&str>) -> bool {
    value == Some("on")
}

/// Keep redirects on this origin; anything else falls back to `default`.
///
/// Browsers read `/\host` like `//host`, so a backslash after the leading
/// slash is rejected too.
#[must_use]
pub fn safe_redirect(to: Option<&str>, default: &str) -> String {
    match to {
        Some(to) if to.starts_with('/') && !to.starts_with("//") && !to.starts_with("/\\") => {
            to.to_string()
        }
        _ => default.to_string(),
    }
}
