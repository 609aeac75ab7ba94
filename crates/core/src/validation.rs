//! SSH public key and password validation
//!
//! Both validators return plain values. SSH key checks stop at the first
//! failure; password checks collect every unmet requirement.

use crate::charset::{has_digit, has_lowercase, has_special, has_uppercase, utf16_len};
use crate::strength::password_strength;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_with::{DisplayFromStr, serde_as};
use thiserror::Error;

/// Key types accepted in an `authorized_keys` style line
pub const SSH_KEY_TYPES: [&str; 6] = [
    "ssh-rsa",
    "ssh-dss",
    "ssh-ed25519",
    "ecdsa-sha2-nistp256",
    "ecdsa-sha2-nistp384",
    "ecdsa-sha2-nistp521",
];

/// Minimum length of the base64 key data
pub const MIN_SSH_KEY_DATA_LEN: usize = 100;

/// Minimum password length
pub const MIN_PASSWORD_LEN: usize = 8;

// `[^\n\r\u{2028}\u{2029}]` keeps the comment on a single line.
static SSH_KEY_FORMAT: Lazy<Regex> = Lazy::new(|| {
    let types = SSH_KEY_TYPES.join("|");
    Regex::new(&format!(
        r"^({types})\s+[A-Za-z0-9+/=]+(\s+[^\n\r\u{{2028}}\u{{2029}}]*)?$"
    ))
    .expect("SSH key pattern is valid")
});

/// Reasons an SSH public key is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SshKeyError {
    #[error("SSH key is required")]
    Missing,

    #[error("Invalid SSH key format. Expected format: ssh-rsa AAAAB3NzaC1yc2E... [comment]")]
    InvalidFormat,

    #[error("SSH key must contain at least key type and key data")]
    MissingKeyData,

    #[error("SSH key data appears to be too short")]
    KeyDataTooShort,
}

/// Validate the format of an SSH public key line.
///
/// This is a shape check only; the key material is never decoded.
pub fn validate_ssh_key(key: &str) -> Result<(), SshKeyError> {
    if key.is_empty() {
        return Err(SshKeyError::Missing);
    }

    let trimmed = key.trim();
    if !SSH_KEY_FORMAT.is_match(trimmed) {
        return Err(SshKeyError::InvalidFormat);
    }

    let mut parts = trimmed.split_whitespace();
    let (Some(_key_type), Some(data)) = (parts.next(), parts.next()) else {
        return Err(SshKeyError::MissingKeyData);
    };

    if utf16_len(data) < MIN_SSH_KEY_DATA_LEN {
        return Err(SshKeyError::KeyDataTooShort);
    }

    Ok(())
}

/// Single-error validation outcome, serialized as `{ valid, error? }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SshKeyValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<(), SshKeyError>> for SshKeyValidation {
    fn from(result: Result<(), SshKeyError>) -> Self {
        match result {
            Ok(()) => Self {
                valid: true,
                error: None,
            },
            Err(err) => Self {
                valid: false,
                error: Some(err.to_string()),
            },
        }
    }
}

/// A password requirement that was not met
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PasswordIssue {
    #[error("Password is required")]
    Required,

    #[error("Password must be at least 8 characters long")]
    TooShort,

    #[error("Password must contain at least one lowercase letter")]
    MissingLowercase,

    #[error("Password must contain at least one uppercase letter")]
    MissingUppercase,

    #[error("Password must contain at least one number")]
    MissingDigit,

    #[error("Password must contain at least one special character")]
    MissingSpecial,
}

/// Multi-error validation outcome, serialized as `{ valid, errors, strength? }`
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordValidation {
    pub valid: bool,
    #[serde_as(as = "Vec<DisplayFromStr>")]
    pub errors: Vec<PasswordIssue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<u8>,
}

impl PasswordValidation {
    /// User-facing messages for every unmet requirement
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Check a password against the complexity rules.
///
/// An empty password reports only [`PasswordIssue::Required`] and carries no
/// strength score. Any other input is scored whether or not it is valid.
pub fn validate_password(password: &str) -> PasswordValidation {
    if password.is_empty() {
        return PasswordValidation {
            valid: false,
            errors: vec![PasswordIssue::Required],
            strength: None,
        };
    }

    let checks = [
        (utf16_len(password) >= MIN_PASSWORD_LEN, PasswordIssue::TooShort),
        (has_lowercase(password), PasswordIssue::MissingLowercase),
        (has_uppercase(password), PasswordIssue::MissingUppercase),
        (has_digit(password), PasswordIssue::MissingDigit),
        (has_special(password), PasswordIssue::MissingSpecial),
    ];
    let errors: Vec<PasswordIssue> = checks
        .into_iter()
        .filter_map(|(ok, issue)| (!ok).then_some(issue))
        .collect();

    PasswordValidation {
        valid: errors.is_empty(),
        errors,
        strength: Some(password_strength(password)),
    }
}
