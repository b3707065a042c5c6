use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{string_value, Validity};
use crate::error::{PasswordRule, ValidationError};

lazy_static! {
    static ref RE_UPPER: Regex = Regex::new(r"[[:upper:]]+").unwrap();
    static ref RE_LOWER: Regex = Regex::new(r"[[:lower:]]+").unwrap();
    static ref RE_PUNCT: Regex = Regex::new(r"[[:punct:]]+").unwrap();
    static ref RE_DIGIT: Regex = Regex::new(r"[[:digit:]]+").unwrap();
    static ref RULES: [(PasswordRule, &'static Regex); 4] = [
        (PasswordRule::Uppercase, &*RE_UPPER),
        (PasswordRule::Lowercase, &*RE_LOWER),
        (PasswordRule::Special, &*RE_PUNCT),
        (PasswordRule::Digit, &*RE_DIGIT),
    ];
}

/// A password that must mix upper and lower case letters, ASCII punctuation
/// and digits.
///
/// Its `Debug` and `Display` output is redacted.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Password(String);

string_value!(Password);

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

impl std::fmt::Display for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("***")
    }
}

impl Password {
    /// Rules this password breaks, in evaluation order.
    pub fn failed_rules(&self) -> Vec<PasswordRule> {
        RULES
            .iter()
            .filter(|(_, re)| !re.is_match(&self.0))
            .map(|(rule, _)| *rule)
            .collect()
    }
}

impl Validity for Password {
    fn validate(&self) -> Result<(), ValidationError> {
        let failed = self.failed_rules();
        if failed.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::WeakPassword(failed))
        }
    }

    fn ok(&self) -> bool {
        RULES.iter().all(|(_, re)| re.is_match(&self.0))
    }
}
