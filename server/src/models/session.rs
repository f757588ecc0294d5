// bazaar/server/src/models/session.rs

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Server-side login session, keyed by the opaque token held in the client's cookie.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Session {
  pub token: String,
  pub user_id: i32,
  pub created_at: DateTime<Utc>,
  /// Fixed at issuance; requests do not extend it.
  pub expires_at: DateTime<Utc>,
}

impl Session {
  pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
    now >= self.expires_at
  }
}
