//! Formatting and validation helpers for the LDAP self-service portal
//!
//! Everything here is pure: no browser access and no hidden state, so the
//! same helpers run in the WASM frontend and in native tests.

mod charset;
pub mod error;
pub mod format;
pub mod strength;
pub mod validation;

pub use error::{CoreResult, FormatError};
pub use format::{
    format_date, format_date_local, format_date_str, format_relative_time,
    format_relative_time_at, format_relative_time_str, from_epoch_millis, parse_timestamp,
};
pub use strength::password_strength;
pub use validation::{
    PasswordIssue, PasswordValidation, SshKeyError, SshKeyValidation, validate_password,
    validate_ssh_key,
};
