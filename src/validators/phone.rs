use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{display_value, string_value, Validity};
use crate::error::ValidationError;

lazy_static! {
    static ref RE_PHONE: Regex = Regex::new(r"^(?:[[:digit:]]+)$").unwrap();
}

/// A phone number made of digits only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Phone(String);

string_value!(Phone);
display_value!(Phone);

impl Validity for Phone {
    fn validate(&self) -> Result<(), ValidationError> {
        if !RE_PHONE.is_match(&self.0) {
            return Err(ValidationError::InvalidPhone);
        }
        Ok(())
    }
}
