//! Account management module.
//!
//! Provides the account model, label parsing, validation and the
//! persisted account store.

mod form;
pub mod labels;
mod model;
mod store;
mod text;
mod validation;

pub use form::AccountForm;
pub use labels::{format_labels, parse_labels};
pub use model::{Account, AccountId, AccountLabel, AccountPatch, AccountType, NewAccount};
pub use store::{AccountStore, DEFAULT_SLOT};
pub use validation::{
    MAX_LOGIN_LEN, MAX_PASSWORD_LEN, ValidationError, ValidationResult, is_valid, validate_account,
};
