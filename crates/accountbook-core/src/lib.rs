//! # accountbook-core
//!
//! Core logic for the `AccountBook` account list.
//!
//! This crate provides:
//! - Account model (LDAP and local accounts with labels)
//! - Label parsing and account validation
//! - The account store, mirrored to injected key-value storage
//! - Memory and file storage backends
//! - Store configuration and logging bootstrap

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod account;
pub mod config;
mod error;
pub mod logging;
pub mod storage;

pub use account::{
    Account, AccountForm, AccountId, AccountLabel, AccountPatch, AccountStore, AccountType,
    NewAccount, format_labels, parse_labels,
};
pub use account::{ValidationError, ValidationResult, is_valid, validate_account};
pub use config::StoreConfig;
pub use error::{Error, Result};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError, StorageResult};
