// bazaar/server/src/models/user.rs

use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id: i32,
  pub username: String,
  /// `salt:hash`, both hex. Never sent to clients.
  #[serde(skip_serializing)]
  #[sqlx(rename = "password")]
  pub password_hash: String,
  pub is_seller: bool,
}

#[derive(Debug, Clone)]
pub struct NewUser {
  pub username: String,
  pub password_hash: String,
  pub is_seller: bool,
}
