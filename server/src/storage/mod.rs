// bazaar/server/src/storage/mod.rs

//! Persistence gateway. Each operation is atomic on its own; callers compose them without transactions.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStorage;
pub use postgres::PgStorage;

use crate::errors::Result;
use crate::models::{CartItem, CartLine, NewCartItem, NewOrder, NewProduct, NewUser, Order, Product, Session, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait Storage: Send + Sync {
  async fn get_user(&self, id: i32) -> Result<Option<User>>;
  async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
  /// Fails with `AppError::Conflict` when the username is taken.
  async fn create_user(&self, user: NewUser) -> Result<User>;

  /// All products, ordered by id.
  async fn list_products(&self) -> Result<Vec<Product>>;
  async fn create_product(&self, product: NewProduct) -> Result<Product>;

  /// The user's cart in insertion order. Items whose product no longer exists are left out.
  async fn list_cart_lines(&self, user_id: i32) -> Result<Vec<CartLine>>;
  /// Always inserts a new row; repeated adds of one product are not merged.
  async fn add_cart_item(&self, item: NewCartItem) -> Result<CartItem>;
  /// Deletes by item id alone. Removing a missing id is not an error.
  async fn remove_cart_item(&self, id: i32) -> Result<()>;
  async fn clear_cart(&self, user_id: i32) -> Result<()>;

  async fn create_order(&self, order: NewOrder) -> Result<Order>;

  async fn create_session(&self, session: Session) -> Result<()>;
  async fn find_session(&self, token: &str) -> Result<Option<Session>>;
  async fn delete_session(&self, token: &str) -> Result<()>;
  /// Returns how many sessions were removed.
  async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64>;
}
