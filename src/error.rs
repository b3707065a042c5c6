use std::fmt;

use thiserror::Error;

/// A character class a password must contain at least once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PasswordRule {
    Uppercase,
    Lowercase,
    Special,
    Digit,
}

impl PasswordRule {
    fn class_name(&self) -> &'static str {
        match self {
            PasswordRule::Uppercase => "uppercase",
            PasswordRule::Lowercase => "lowercase",
            PasswordRule::Special => "special",
            PasswordRule::Digit => "digit",
        }
    }
}

impl fmt::Display for PasswordRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "password should contain one or more {} character",
            self.class_name()
        )
    }
}

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum ValidationError {
    #[error("not valid email")]
    InvalidEmail,
    #[error("not valid phone number")]
    InvalidPhone,
    /// Every rule the password broke, in evaluation order.
    #[error("{}", join_rules(.0))]
    WeakPassword(Vec<PasswordRule>),
}

impl ValidationError {
    /// Short machine-readable code, used when reporting through `validator`.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidEmail => "email",
            ValidationError::InvalidPhone => "phone",
            ValidationError::WeakPassword(_) => "password",
        }
    }
}

fn join_rules(rules: &[PasswordRule]) -> String {
    rules
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
