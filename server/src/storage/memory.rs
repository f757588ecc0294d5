// bazaar/server/src/storage/memory.rs

use super::Storage;
use crate::errors::{AppError, Result};
use crate::models::{CartItem, CartLine, NewCartItem, NewOrder, NewProduct, NewUser, Order, Product, Session, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Default)]
struct Tables {
  users: Vec<User>,
  products: Vec<Product>,
  cart_items: Vec<CartItem>,
  orders: Vec<Order>,
  sessions: HashMap<String, Session>,
  next_user_id: i32,
  next_product_id: i32,
  next_cart_item_id: i32,
  next_order_id: i32,
}

fn next_id(counter: &mut i32) -> i32 {
  *counter += 1;
  *counter
}

/// Process-local storage. Rows live in insertion order so id order is preserved.
#[derive(Default)]
pub struct MemoryStorage {
  tables: Mutex<Tables>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn user_count(&self) -> usize {
    self.tables.lock().users.len()
  }

  pub fn orders_for(&self, user_id: i32) -> Vec<Order> {
    self
      .tables
      .lock()
      .orders
      .iter()
      .filter(|o| o.user_id == user_id)
      .cloned()
      .collect()
  }

  pub fn session_count(&self) -> usize {
    self.tables.lock().sessions.len()
  }
}

#[async_trait]
impl Storage for MemoryStorage {
  async fn get_user(&self, id: i32) -> Result<Option<User>> {
    Ok(self.tables.lock().users.iter().find(|u| u.id == id).cloned())
  }

  async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
    Ok(self.tables.lock().users.iter().find(|u| u.username == username).cloned())
  }

  async fn create_user(&self, user: NewUser) -> Result<User> {
    let mut tables = self.tables.lock();
    if tables.users.iter().any(|u| u.username == user.username) {
      return Err(AppError::Conflict("Username already exists".to_string()));
    }
    let created = User {
      id: next_id(&mut tables.next_user_id),
      username: user.username,
      password_hash: user.password_hash,
      is_seller: user.is_seller,
    };
    tables.users.push(created.clone());
    Ok(created)
  }

  async fn list_products(&self) -> Result<Vec<Product>> {
    Ok(self.tables.lock().products.clone())
  }

  async fn create_product(&self, product: NewProduct) -> Result<Product> {
    let mut tables = self.tables.lock();
    let created = Product {
      id: next_id(&mut tables.next_product_id),
      title: product.title,
      description: product.description,
      price: product.price,
      image_url: product.image_url,
      seller_id: product.seller_id,
    };
    tables.products.push(created.clone());
    Ok(created)
  }

  async fn list_cart_lines(&self, user_id: i32) -> Result<Vec<CartLine>> {
    let tables = self.tables.lock();
    let lines = tables
      .cart_items
      .iter()
      .filter(|item| item.user_id == user_id)
      .filter_map(|item| {
        tables
          .products
          .iter()
          .find(|p| p.id == item.product_id)
          .map(|product| CartLine {
            item: item.clone(),
            product: product.clone(),
          })
      })
      .collect();
    Ok(lines)
  }

  async fn add_cart_item(&self, item: NewCartItem) -> Result<CartItem> {
    let mut tables = self.tables.lock();
    let created = CartItem {
      id: next_id(&mut tables.next_cart_item_id),
      user_id: item.user_id,
      product_id: item.product_id,
      quantity: item.quantity,
    };
    tables.cart_items.push(created.clone());
    Ok(created)
  }

  async fn remove_cart_item(&self, id: i32) -> Result<()> {
    self.tables.lock().cart_items.retain(|item| item.id != id);
    Ok(())
  }

  async fn clear_cart(&self, user_id: i32) -> Result<()> {
    self.tables.lock().cart_items.retain(|item| item.user_id != user_id);
    Ok(())
  }

  async fn create_order(&self, order: NewOrder) -> Result<Order> {
    let mut tables = self.tables.lock();
    let created = Order {
      id: next_id(&mut tables.next_order_id),
      user_id: order.user_id,
      total: order.total,
      status: order.status,
      created_at: Utc::now(),
    };
    tables.orders.push(created.clone());
    Ok(created)
  }

  async fn create_session(&self, session: Session) -> Result<()> {
    self.tables.lock().sessions.insert(session.token.clone(), session);
    Ok(())
  }

  async fn find_session(&self, token: &str) -> Result<Option<Session>> {
    Ok(self.tables.lock().sessions.get(token).cloned())
  }

  async fn delete_session(&self, token: &str) -> Result<()> {
    self.tables.lock().sessions.remove(token);
    Ok(())
  }

  async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64> {
    let mut tables = self.tables.lock();
    let before = tables.sessions.len();
    tables.sessions.retain(|_, s| !s.is_expired(now));
    Ok((before - tables.sessions.len()) as u64)
  }
}
