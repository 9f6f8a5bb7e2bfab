//! Argon2id adapter for the password hashing port.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString, rand_core::OsRng,
    },
};

use crate::domain::PasswordDigest;
use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Argon2 cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Params {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Degree of parallelism (lanes).
    pub parallelism: u32,
}

impl Default for Argon2Params {
    /// Argon2id RFC 9106 second recommended option.
    fn default() -> Self {
        Self {
            memory_kib: 19456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// Salted Argon2id hasher producing PHC strings.
#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordHasher {
    params: Argon2Params,
}

impl Argon2PasswordHasher {
    /// Use explicit cost parameters. Tests lower them to stay fast.
    pub fn with_params(params: Argon2Params) -> Self {
        Self { params }
    }

    fn argon2(&self) -> Result<Argon2<'static>, PasswordHashError> {
        let Argon2Params {
            memory_kib,
            iterations,
            parallelism,
        } = self.params;
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|err| PasswordHashError::hash(format!("invalid argon2 params: {err}")))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<PasswordDigest, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| PasswordHashError::hash(err.to_string()))?;
        Ok(PasswordDigest::new(hash.to_string()))
    }

    /// Verification uses the parameters embedded in the stored hash.
    fn verify(&self, password: &str, digest: &PasswordDigest) -> Result<bool, PasswordHashError> {
        let parsed = PasswordHash::new(digest.as_ref())
            .map_err(|err| PasswordHashError::malformed(err.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}
