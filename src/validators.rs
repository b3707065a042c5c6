mod email;
mod password;
mod phone;

use std::borrow::Cow;

pub use email::Email;
pub use password::Password;
pub use phone::Phone;

use crate::error::ValidationError;

/// A value that can check itself against a fixed rule set.
pub trait Validity {
    fn validate(&self) -> Result<(), ValidationError>;

    fn ok(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Common plumbing for the string-backed value types.
macro_rules! string_value {
    ($name:ident) => {
        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

    };
}

/// Plain-text `Display` for value types that are safe to print.
macro_rules! display_value {
    ($name:ident) => {
        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

pub(crate) use display_value;
pub(crate) use string_value;

fn into_validator_error(err: ValidationError) -> validator::ValidationError {
    let mut rv = validator::ValidationError::new(err.code());
    rv.message = Some(Cow::from(err.to_string()));
    rv
}

/// For `#[validate(custom(function = "validate_email"))]`.
pub fn validate_email(value: &str) -> Result<(), validator::ValidationError> {
    Email::from(value).validate().map_err(into_validator_error)
}

/// For `#[validate(custom(function = "validate_password"))]`.
pub fn validate_password(value: &str) -> Result<(), validator::ValidationError> {
    Password::from(value)
        .validate()
        .map_err(into_validator_error)
}

/// For `#[validate(custom(function = "validate_phone"))]`.
pub fn validate_phone(value: &str) -> Result<(), validator::ValidationError> {
    Phone::from(value).validate().map_err(into_validator_error)
}
