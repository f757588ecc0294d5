// bazaar/server/src/services/auth_service.rs

//! Password hashing and verification.
//!
//! Stored credentials are `salt_hex:key_hex`: a 16-byte random salt and a 64-byte Argon2id key.
//! Cost parameters come from configuration and are not embedded in the stored string.

use crate::errors::{AppError, Result};
use argon2::{Algorithm, Argon2, Params, Version};
use rand_core::{OsRng, RngCore};
use subtle::ConstantTimeEq;
use tracing::{debug, error, instrument, warn};

pub const SALT_LEN: usize = 16;
pub const KEY_LEN: usize = 64;

/// Derives and checks stored credentials. Both calls are CPU-bound; run them off the async executor.
pub trait CredentialHasher: Send + Sync {
  fn hash(&self, password: &str) -> Result<String>;

  /// `Ok(false)` for a wrong password and for a stored value that cannot be parsed.
  fn verify(&self, stored: &str, candidate: &str) -> Result<bool>;
}

#[derive(Clone)]
pub struct Argon2Hasher {
  params: Params,
}

impl Argon2Hasher {
  pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self> {
    let params = Params::new(memory_kib, iterations, parallelism, Some(KEY_LEN))
      .map_err(|e| AppError::Config(format!("Invalid Argon2 parameters: {}", e)))?;
    Ok(Self { params })
  }

  fn derive(&self, password: &[u8], salt: &[u8]) -> Result<[u8; KEY_LEN]> {
    let mut key = [0u8; KEY_LEN];
    Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
      .hash_password_into(password, salt, &mut key)
      .map_err(|e| {
        error!(error = %e, "Argon2 key derivation failed.");
        AppError::Internal(format!("Password hashing process failed: {}", e))
      })?;
    Ok(key)
  }
}

impl CredentialHasher for Argon2Hasher {
  #[instrument(name = "auth_service::hash", skip_all, err(Display))]
  fn hash(&self, password: &str) -> Result<String> {
    if password.is_empty() {
      return Err(AppError::Validation("Password cannot be empty.".to_string()));
    }
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let key = self.derive(password.as_bytes(), &salt)?;
    debug!("Password hashed successfully.");
    Ok(format!("{}:{}", hex::encode(salt), hex::encode(key)))
  }

  #[instrument(name = "auth_service::verify", skip_all, fields(stored_len = stored.len()))]
  fn verify(&self, stored: &str, candidate: &str) -> Result<bool> {
    let Some((salt_hex, key_hex)) = stored.split_once(':') else {
      warn!("Stored credential is missing its salt separator.");
      return Ok(false);
    };
    let (salt, expected) = match (hex::decode(salt_hex), hex::decode(key_hex)) {
      (Ok(salt), Ok(key)) if !salt.is_empty() && key.len() == KEY_LEN => (salt, key),
      _ => {
        warn!("Stored credential is not valid hex of the expected length.");
        return Ok(false);
      }
    };

    let mut key = [0u8; KEY_LEN];
    if let Err(e) = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
      .hash_password_into(candidate.as_bytes(), &salt, &mut key)
    {
      warn!(error = %e, "Argon2 rejected stored salt or candidate.");
      return Ok(false);
    }

    Ok(bool::from(key.as_slice().ct_eq(expected.as_slice())))
  }
}
