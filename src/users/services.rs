use std::sync::Arc;

use tokio::task::spawn_blocking;
use tracing::{info, instrument, warn};

use super::errors::UserError;
use super::password::CredentialHasher;
use super::repo::UserStore;
use super::repo_types::{NewUser, UserRecord};

/// Signup and login on top of a [`UserStore`], independent of the web layer.
#[derive(Clone)]
pub struct CredentialService {
    store: Arc<dyn UserStore>,
    hasher: CredentialHasher,
}

impl CredentialService {
    pub fn new(store: Arc<dyn UserStore>, hasher: CredentialHasher) -> Self {
        Self { store, hasher }
    }

    /// Create an account. The returned record carries the password hash;
    /// callers facing the network must strip it.
    #[instrument(skip(self, name, email, password), fields(email = %email))]
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserRecord, UserError> {
        if self.store.find_by_email(email).await?.is_some() {
            warn!("email already registered");
            return Err(UserError::DuplicateEmail);
        }

        let hash = self.hash(password).await?;

        // The store re-checks uniqueness atomically; a concurrent signup that
        // slipped past the lookup above still ends in DuplicateEmail.
        let user = self
            .store
            .save(NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash: hash,
            })
            .await
            .inspect_err(|e| {
                if matches!(e, UserError::DuplicateEmail) {
                    warn!("email registered concurrently");
                }
            })?;

        info!(user_id = user.id, "user registered");
        Ok(user)
    }

    /// Unknown email and wrong password both yield `InvalidCredentials`.
    #[instrument(skip(self, email, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<UserRecord, UserError> {
        let Some(user) = self.store.find_by_email(email).await? else {
            warn!("login unknown email");
            return Err(UserError::InvalidCredentials);
        };

        if !self.verify(password, &user.password_hash).await? {
            warn!(user_id = user.id, "login invalid password");
            return Err(UserError::InvalidCredentials);
        }

        info!(user_id = user.id, "user logged in");
        Ok(user)
    }

    async fn hash(&self, password: &str) -> Result<String, UserError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| UserError::Hash(e.to_string()))?
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, UserError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        let hash = hash.to_string();
        spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| UserError::Hash(e.to_string()))?
    }
}
