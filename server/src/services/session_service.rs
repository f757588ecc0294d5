// bazaar/server/src/services/session_service.rs

//! Server-side sessions: opaque random tokens mapped to a user id with a fixed expiry.

use crate::errors::{AppError, Result};
use crate::models::Session;
use crate::storage::Storage;
use chrono::{DateTime, Duration, Utc};
use rand_core::{OsRng, RngCore};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub const TOKEN_BYTES: usize = 32;

pub fn generate_session_token() -> String {
  let mut bytes = [0u8; TOKEN_BYTES];
  OsRng.fill_bytes(&mut bytes);
  hex::encode(bytes)
}

/// Persists a fresh session for `user_id` and returns it.
#[instrument(name = "session_service::open", skip(storage))]
pub async fn open_session(storage: &dyn Storage, user_id: i32, ttl: Duration) -> Result<Session> {
  let created_at = Utc::now();
  let expires_at = created_at
    .checked_add_signed(ttl)
    .ok_or_else(|| AppError::Internal("Session expiry is out of range".to_string()))?;
  let session = Session {
    token: generate_session_token(),
    user_id,
    created_at,
    expires_at,
  };
  storage.create_session(session.clone()).await?;
  debug!(expires_at = %session.expires_at, "Session opened.");
  Ok(session)
}

/// Looks up a live session. Unknown and expired tokens both resolve to `None`.
#[instrument(name = "session_service::resolve", skip_all)]
pub async fn resolve_session(storage: &dyn Storage, token: &str, now: DateTime<Utc>) -> Result<Option<Session>> {
  match storage.find_session(token).await? {
    Some(session) if session.is_expired(now) => {
      debug!(user_id = session.user_id, "Session expired.");
      Ok(None)
    }
    other => Ok(other),
  }
}

/// Deletes the session if it exists.
#[instrument(name = "session_service::close", skip_all)]
pub async fn close_session(storage: &dyn Storage, token: &str) -> Result<()> {
  storage.delete_session(token).await
}

/// Periodically removes expired sessions for the lifetime of the runtime.
pub fn spawn_session_pruner(storage: Arc<dyn Storage>, every: std::time::Duration) {
  actix_web::rt::spawn(async move {
    let mut ticker = tokio::time::interval(every);
    loop {
      ticker.tick().await;
      match storage.delete_expired_sessions(Utc::now()).await {
        Ok(0) => {}
        Ok(removed) => info!(removed, "Pruned expired sessions."),
        Err(e) => warn!(error = %e, "Session pruning failed."),
      }
    }
  });
}
