//! Sign-in, sign-out and contact verification

use super::{ClientError, PortalClient};
use crate::types::{
    EmailVerification, LoginRequest, LoginResponse, SmsVerification, User, VerificationRequest,
};
use reqwest::Method;

impl PortalClient {
    /// Sign in and store the returned session
    pub async fn login(&self, username: &str, password: &str) -> Result<User, ClientError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(ClientError::validation("Username and password are required"));
        }

        let request = self.request(Method::POST, "/login").json(&LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        });
        let response: LoginResponse = self.execute(request).await?;

        let host = self.host();
        host.set_item(self.config().token_key(), &response.token);
        host.set_item(
            self.config().user_key(),
            &serde_json::to_string(&response.user)?,
        );

        info!(username = %response.user.username, "Signed in");
        Ok(response.user)
    }

    /// Drop the stored session
    pub fn logout(&self) {
        let host = self.host();
        host.remove_item(self.config().token_key());
        host.remove_item(self.config().user_key());
        info!("Signed out");
    }

    /// Whether a token is stored
    pub fn is_authenticated(&self) -> bool {
        self.host()
            .get_item(self.config().token_key())
            .is_some_and(|token| !token.is_empty())
    }

    /// User record stored at sign-in, if it can still be read
    pub fn stored_user(&self) -> Option<User> {
        let raw = self.host().get_item(self.config().user_key())?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable stored user record");
                None
            }
        }
    }

    /// Check an email verification code
    pub async fn verify_email(
        &self,
        token: &str,
        code: &str,
    ) -> Result<EmailVerification, ClientError> {
        let request = self
            .request(Method::POST, "/verify-email")
            .json(&verification(token, code));
        self.execute(request).await
    }

    /// Check an SMS verification code
    pub async fn verify_sms(
        &self,
        token: &str,
        code: &str,
    ) -> Result<SmsVerification, ClientError> {
        let request = self
            .request(Method::POST, "/verify-sms")
            .json(&verification(token, code));
        self.execute(request).await
    }
}

fn verification(token: &str, code: &str) -> VerificationRequest {
    VerificationRequest {
        code: code.trim().to_string(),
        token: token.to_string(),
    }
}
