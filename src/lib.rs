//! Pagination for sea-orm queries and small string validation types.

pub mod axumext;
pub mod error;
pub mod paginator;
pub mod validators;

pub use error::{PasswordRule, ValidationError};
pub use paginator::{
    CountQuery, CountSource, PageRequest, PageScope, Paginator, SortDirection,
};
pub use validators::{Email, Password, Phone, Validity};
