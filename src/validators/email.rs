use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{display_value, string_value, Validity};
use crate::error::ValidationError;

lazy_static! {
    static ref RE_EMAIL: Regex = Regex::new(
        r"^(?:[[:alnum:]]+[[:alnum:]\-\.]+[[:alnum:]])+@(?:[[:alnum:]]+[[:alnum:]\-\.]+[[:alnum:]])+\.(?:[[:alpha:]]{2,6})$"
    )
    .unwrap();
}

/// An email address, checked on demand.
///
/// ```
/// use plank::{Email, Validity};
///
/// assert!(Email::from("HtH8O@example.com").ok());
/// assert!(Email::from("example.com").validate().is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

string_value!(Email);
display_value!(Email);

impl Validity for Email {
    fn validate(&self) -> Result<(), ValidationError> {
        if !RE_EMAIL.is_match(&self.0) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(())
    }
}
