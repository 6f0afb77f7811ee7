use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::error;

use super::errors::UserError;
use crate::config::HashingConfig;

/// Argon2id password hasher. Holds only cost parameters, so it is cheap to
/// clone into blocking tasks.
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    params: Params,
}

impl CredentialHasher {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    pub fn from_config(cfg: &HashingConfig) -> anyhow::Result<Self> {
        let params = Params::new(cfg.memory_kib, cfg.iterations, cfg.parallelism, None)
            .map_err(|e| anyhow::anyhow!("invalid argon2 params: {e}"))?;
        Ok(Self::new(params))
    }

    fn engine(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash(&self, plain: &str) -> Result<String, UserError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .engine()
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                UserError::Hash(e.to_string())
            })?
            .to_string();
        Ok(hash)
    }

    /// Cost parameters come from the stored PHC string, not from `self`.
    pub fn verify(&self, plain: &str, hash: &str) -> Result<bool, UserError> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            error!(error = %e, "argon2 parse hash error");
            UserError::Hash(e.to_string())
        })?;
        Ok(self
            .engine()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok())
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self::new(Params::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> CredentialHasher {
        CredentialHasher::from_config(&HashingConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("params should be valid")
    }

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hasher().hash(password).expect("hashing should succeed");
        assert!(hasher().verify(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hasher().hash(password).expect("hashing should succeed");
        assert!(!hasher()
            .verify("wrong-password", &hash)
            .expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = hasher().verify("anything", "not-a-valid-hash").unwrap_err();
        assert!(matches!(err, UserError::Hash(_)));
    }

    #[test]
    fn same_password_gets_fresh_salt() {
        let h = hasher();
        let a = h.hash("pw1").unwrap();
        let b = h.hash("pw1").unwrap();
        assert_ne!(a, b);
        assert!(h.verify("pw1", &a).unwrap());
        assert!(h.verify("pw1", &b).unwrap());
    }

    #[test]
    fn hash_is_argon2id_phc_string() {
        let hash = hasher().hash("pw").unwrap();
        assert!(hash.starts_with("$argon2id$v=19$m=1024,t=1,p=1$"));
    }

    #[test]
    fn verifies_hashes_made_with_other_costs() {
        let old = CredentialHasher::from_config(&HashingConfig {
            memory_kib: 2048,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();
        let hash = old.hash("legacy").unwrap();
        assert!(hasher().verify("legacy", &hash).unwrap());
    }

    #[test]
    fn rejects_impossible_params() {
        let err = CredentialHasher::from_config(&HashingConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        })
        .unwrap_err();
        assert!(err.to_string().contains("argon2"));
    }
}
