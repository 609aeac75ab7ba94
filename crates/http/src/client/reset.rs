//! Password reset for users who cannot sign in

use super::{ClientError, PortalClient};
use crate::types::{
    MessageResponse, PasswordResetConfirm, PasswordResetRequest, PasswordResetResponse,
    ResetMethod,
};
use portal_core::validate_password;
use reqwest::Method;

impl PortalClient {
    /// Ask the server to deliver a reset code by email or SMS
    pub async fn request_password_reset(
        &self,
        username: &str,
        method: ResetMethod,
    ) -> Result<PasswordResetResponse, ClientError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ClientError::validation("Username is required"));
        }

        let request = self
            .request(Method::POST, "/reset-password")
            .json(&PasswordResetRequest {
                username: username.to_string(),
                method,
            });
        self.execute(request).await
    }

    /// Set a new password using the delivered code
    pub async fn confirm_password_reset(
        &self,
        token: &str,
        code: &str,
        new_password: &str,
    ) -> Result<MessageResponse, ClientError> {
        if code.trim().is_empty() {
            return Err(ClientError::validation("Verification code is required"));
        }
        let check = validate_password(new_password);
        if !check.valid {
            return Err(ClientError::Validation(check.messages()));
        }

        let request = self
            .request(Method::POST, "/reset-password/confirm")
            .json(&PasswordResetConfirm {
                token: token.to_string(),
                code: code.trim().to_string(),
                new_password: new_password.to_string(),
            });
        self.execute(request).await
    }
}
