// bazaar/server/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
  Postgres,
  /// Non-persistent; for tests and local tinkering.
  Memory,
}

impl FromStr for StorageBackend {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.to_ascii_lowercase().as_str() {
      "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
      "memory" => Ok(StorageBackend::Memory),
      other => Err(AppError::Config(format!("Invalid STORAGE value '{}'", other))),
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub storage_backend: StorageBackend,
  /// Required when `storage_backend` is `Postgres`.
  pub database_url: Option<String>,

  pub session_cookie_name: String,
  pub session_ttl_days: i64,
  /// `session_ttl_days` as a duration; always representable as an expiry from now.
  session_ttl: chrono::Duration,
  pub session_cookie_secure: bool,
  pub session_prune_interval_secs: u64,

  // Argon2 cost parameters for password hashing.
  pub hash_memory_kib: u32,
  pub hash_iterations: u32,
  pub hash_parallelism: u32,

  pub seed_db: bool,
  pub seed_seller_password: String,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from any variable source; `from_env` passes the process environment.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get_or = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());
    fn parse<T: FromStr>(name: &str, raw: String) -> Result<T>
    where
      T::Err: std::fmt::Display,
    {
      raw
        .trim()
        .parse::<T>()
        .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", name, raw, e)))
    }

    let server_host = get_or("SERVER_HOST", "127.0.0.1");
    let server_port = parse::<u16>("SERVER_PORT", get_or("SERVER_PORT", "8080"))?;
    let storage_backend = get_or("STORAGE", "postgres").parse::<StorageBackend>()?;
    let database_url = lookup("DATABASE_URL");
    if storage_backend == StorageBackend::Postgres && database_url.is_none() {
      return Err(AppError::Config(
        "Missing environment variable 'DATABASE_URL' (required for postgres storage)".to_string(),
      ));
    }

    let session_cookie_name = get_or("SESSION_COOKIE_NAME", "bazaar.sid");
    let session_ttl_days = parse::<i64>("SESSION_TTL_DAYS", get_or("SESSION_TTL_DAYS", "30"))?;
    if session_ttl_days <= 0 {
      return Err(AppError::Config("SESSION_TTL_DAYS must be positive".to_string()));
    }
    let session_ttl = chrono::Duration::try_days(session_ttl_days)
      .filter(|ttl| chrono::Utc::now().checked_add_signed(*ttl).is_some())
      .ok_or_else(|| AppError::Config(format!("SESSION_TTL_DAYS value {} is too large", session_ttl_days)))?;
    let session_cookie_secure = parse::<bool>("SESSION_COOKIE_SECURE", get_or("SESSION_COOKIE_SECURE", "false"))?;
    let session_prune_interval_secs = parse::<u64>(
      "SESSION_PRUNE_INTERVAL_SECS",
      get_or("SESSION_PRUNE_INTERVAL_SECS", "900"),
    )?;
    if session_prune_interval_secs == 0 {
      return Err(AppError::Config("SESSION_PRUNE_INTERVAL_SECS must be positive".to_string()));
    }

    let hash_memory_kib = parse::<u32>("HASH_MEMORY_KIB", get_or("HASH_MEMORY_KIB", "19456"))?;
    let hash_iterations = parse::<u32>("HASH_ITERATIONS", get_or("HASH_ITERATIONS", "2"))?;
    let hash_parallelism = parse::<u32>("HASH_PARALLELISM", get_or("HASH_PARALLELISM", "1"))?;

    let seed_db = parse::<bool>("SEED_DB", get_or("SEED_DB", "false"))?;
    let seed_seller_password = get_or("SEED_SELLER_PASSWORD", "password");

    tracing::info!(?storage_backend, %server_host, server_port, "Application configuration loaded.");

    Ok(Self {
      server_host,
      server_port,
      storage_backend,
      database_url,
      session_cookie_name,
      session_ttl_days,
      session_ttl,
      session_cookie_secure,
      session_prune_interval_secs,
      hash_memory_kib,
      hash_iterations,
      hash_parallelism,
      seed_db,
      seed_seller_password,
    })
  }

  pub fn session_ttl(&self) -> chrono::Duration {
    self.session_ttl
  }
}
