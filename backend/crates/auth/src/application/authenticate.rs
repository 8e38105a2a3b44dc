//! Authenticate Use Case
//!
//! Checks a username/password pair against the credential store.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::identity::Identity;
use crate::domain::repository::CredentialRepository;
use crate::domain::value_object::{
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::AuthFailure;

/// Authenticate use case
pub struct Authenticator<U>
where
    U: CredentialRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> Authenticator<U>
where
    U: CredentialRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    /// Unknown user and wrong password both yield
    /// [`AuthFailure::InvalidCredentials`].
    pub async fn authenticate(
        &self,
        username: &str,
        password: String,
    ) -> Result<Identity, AuthFailure> {
        // A name that could never have been registered cannot match
        let user_name = UserName::new(username).map_err(|_| AuthFailure::InvalidCredentials)?;
        let raw_password =
            RawPassword::new(password).map_err(|_| AuthFailure::InvalidCredentials)?;

        let Some(credential) = self.user_repo.find_by_user_name(&user_name).await? else {
            // Spend the same hashing work as a real mismatch
            let _ = UserPassword::dummy(self.config.hash_cost)
                .verify(raw_password, self.config.pepper())
                .await;
            return Err(AuthFailure::InvalidCredentials);
        };

        let password_valid = credential
            .password_hash
            .verify(raw_password, self.config.pepper())
            .await
            .map_err(|e| AuthFailure::MechanismError(e.to_string()))?;

        if !password_valid {
            return Err(AuthFailure::InvalidCredentials);
        }

        tracing::info!(user_id = %credential.user_id, "User authenticated");

        Ok(credential.identity())
    }
}
