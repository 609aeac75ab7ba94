//! Profile, SSH key and password endpoints for the signed-in user

use super::{ClientError, PortalClient};
use crate::types::{
    AddSshKeyRequest, MessageResponse, PasswordChangeRequest, SshKey, SshKeysResponse, User,
};
use portal_core::{validate_password, validate_ssh_key};
use reqwest::Method;

impl PortalClient {
    /// Fetch the profile of the signed-in user
    pub async fn profile(&self) -> Result<User, ClientError> {
        let request = self.request(Method::GET, "/profile");
        self.execute(request).await
    }

    /// List the registered SSH keys
    pub async fn ssh_keys(&self) -> Result<Vec<SshKey>, ClientError> {
        let request = self.request(Method::GET, "/ssh-keys");
        let response: SshKeysResponse = self.execute(request).await?;
        Ok(response.ssh_keys)
    }

    /// Register a new SSH key.
    ///
    /// The key is checked locally first; a malformed key is never sent.
    pub async fn add_ssh_key(
        &self,
        name: &str,
        public_key: &str,
    ) -> Result<MessageResponse, ClientError> {
        validate_ssh_key(public_key).map_err(|e| ClientError::validation(e.to_string()))?;

        let request = self.request(Method::POST, "/ssh-keys").json(&AddSshKeyRequest {
            name: name.trim().to_string(),
            public_key: public_key.trim().to_string(),
        });
        self.execute(request).await
    }

    /// Remove the key at `index` in the list returned by [`Self::ssh_keys`]
    pub async fn delete_ssh_key(&self, index: usize) -> Result<MessageResponse, ClientError> {
        let request = self.request(Method::DELETE, &format!("/ssh-keys/{index}"));
        self.execute(request).await
    }

    /// Change the password of the signed-in user.
    ///
    /// The confirmation must match and the new password must satisfy the
    /// complexity rules before anything is sent.
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<MessageResponse, ClientError> {
        if current_password.is_empty() {
            return Err(ClientError::validation("Current password is required"));
        }
        if new_password != confirm_password {
            return Err(ClientError::validation("Passwords do not match"));
        }
        let check = validate_password(new_password);
        if !check.valid {
            return Err(ClientError::Validation(check.messages()));
        }

        let request = self
            .request(Method::PUT, "/password")
            .json(&PasswordChangeRequest {
                current_password: current_password.to_string(),
                new_password: new_password.to_string(),
                confirm_password: confirm_password.to_string(),
            });
        self.execute(request).await
    }
}
