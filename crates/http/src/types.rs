//! Request and response bodies of the portal API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnNull, serde_as};
use std::fmt;

/// Directory account as returned by the API
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub dn: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub ssh_keys: Vec<SshKey>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// "First Last", falling back to the username
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// Public key registered on the account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SshKey {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub public_key: String,
    #[serde(default)]
    pub fingerprint: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Login request
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Key listing response
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SshKeysResponse {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub ssh_keys: Vec<SshKey>,
}

/// Request to register a new key
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSshKeyRequest {
    pub name: String,
    pub public_key: String,
}

/// Request to change the password of the signed-in user
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangeRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Channel used to deliver a password reset code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetMethod {
    Email,
    Sms,
}

impl fmt::Display for ResetMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => write!(f, "email"),
            Self::Sms => write!(f, "sms"),
        }
    }
}

/// Request to start a password reset
#[derive(Debug, Serialize, Deserialize)]
pub struct PasswordResetRequest {
    pub username: String,
    pub method: ResetMethod,
}

/// Response to a reset request; `token` identifies the pending code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetResponse {
    pub message: String,
    pub token: String,
    pub method: ResetMethod,
}

/// Request to finish a password reset with the delivered code
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetConfirm {
    pub token: String,
    pub code: String,
    pub new_password: String,
}

/// Verification code submission
#[derive(Debug, Serialize, Deserialize)]
pub struct VerificationRequest {
    pub code: String,
    pub token: String,
}

/// Result of an email verification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailVerification {
    pub verified: bool,
    #[serde(default)]
    pub email: String,
}

/// Result of an SMS verification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsVerification {
    pub verified: bool,
    #[serde(default)]
    pub phone: String,
}

/// Plain acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
