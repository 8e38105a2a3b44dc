//! Register Use Case
//!
//! Creates a new credential from a username and password.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::{credential::Credential, identity::Identity};
use crate::domain::repository::CredentialRepository;
use crate::domain::value_object::{
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::RegistrationError;

/// Register use case
pub struct Registrar<U>
where
    U: CredentialRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> Registrar<U>
where
    U: CredentialRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    /// Register a new user.
    ///
    /// Uniqueness is enforced by the store on insert, so two concurrent
    /// registrations of one name yield exactly one success.
    pub async fn register(
        &self,
        username: &str,
        password: String,
    ) -> Result<Identity, RegistrationError> {
        let user_name = UserName::new(username)
            .map_err(|e| RegistrationError::InvalidInput(e.to_string()))?;
        let raw_password = RawPassword::new(password)
            .map_err(|e| RegistrationError::InvalidInput(e.to_string()))?;

        // Cheap early rejection; the insert below is authoritative
        if self.user_repo.find_by_user_name(&user_name).await?.is_some() {
            return Err(RegistrationError::DuplicateUsername);
        }

        let password_hash =
            UserPassword::derive(raw_password, self.config.pepper(), self.config.hash_cost)
                .await
                .map_err(|e| RegistrationError::MechanismError(e.to_string()))?;

        let credential = Credential::new(user_name, password_hash);
        let user_id = self.user_repo.insert(&credential).await?;

        tracing::info!(%user_id, user_name = %credential.user_name, "User registered");

        Ok(credential.identity())
    }
}
