use std::sync::Arc;

use crate::domain::{Principal, User};
use crate::error::DomainError;
use crate::ports::{AuthError, PasswordService, UserRepository};

/// Credential checks for the login form.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { users, passwords }
    }

    /// Check a username/password pair. Unknown users and wrong passwords both
    /// come back as `None`.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Principal>, DomainError> {
        let Some(user) = self.users.find_by_username(username.trim()).await? else {
            tracing::warn!("Login attempt for unknown user");
            return Ok(None);
        };

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(auth_failure)?;
        if !valid {
            tracing::warn!(user = %user.username, "Login attempt with wrong password");
            return Ok(None);
        }

        Ok(Some(user.principal()))
    }

    /// Create `username` unless it already exists. Returns the stored user
    /// and whether it was created by this call.
    pub async fn ensure_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(User, bool), DomainError> {
        if let Some(existing) = self.users.find_by_username(username).await? {
            return Ok((existing, false));
        }

        let hash = self.passwords.hash(password).map_err(auth_failure)?;
        let user = self
            .users
            .insert(User::new(username.to_string(), hash))
            .await?;
        tracing::info!(user = %user.username, "User created");
        Ok((user, true))
    }
}

fn auth_failure(err: AuthError) -> DomainError {
    tracing::error!("Password service failure: {}", err);
    DomainError::Internal(err.to_string())
}
