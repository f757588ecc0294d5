// bazaar/server/src/storage/postgres.rs

use super::Storage;
use crate::errors::{AppError, Result};
use crate::models::{
  CartItem, CartLine, NewCartItem, NewOrder, NewProduct, NewUser, Order, OrderStatus, Product, Session, User,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use tracing::{info, instrument};

const SCHEMA_SQL: &str = include_str!("../../schema.sql");

#[derive(Clone)]
pub struct PgStorage {
  pool: PgPool,
}

#[derive(FromRow)]
struct CartLineRow {
  id: i32,
  user_id: i32,
  product_id: i32,
  quantity: i32,
  title: String,
  description: String,
  price: i64,
  image_url: String,
  seller_id: i32,
}

impl From<CartLineRow> for CartLine {
  fn from(row: CartLineRow) -> Self {
    CartLine {
      item: CartItem {
        id: row.id,
        user_id: row.user_id,
        product_id: row.product_id,
        quantity: row.quantity,
      },
      product: Product {
        id: row.product_id,
        title: row.title,
        description: row.description,
        price: row.price,
        image_url: row.image_url,
        seller_id: row.seller_id,
      },
    }
  }
}

#[derive(FromRow)]
struct OrderRow {
  id: i32,
  user_id: i32,
  total: i64,
  status: String,
  created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
  type Error = AppError;

  fn try_from(row: OrderRow) -> Result<Self> {
    let status = row.status.parse::<OrderStatus>().map_err(AppError::Internal)?;
    Ok(Order {
      id: row.id,
      user_id: row.user_id,
      total: row.total,
      status,
      created_at: row.created_at,
    })
  }
}

impl PgStorage {
  pub async fn connect(database_url: &str) -> Result<Self> {
    let pool = PgPoolOptions::new().max_connections(5).connect(database_url).await?;
    info!("Database pool created successfully.");
    Ok(Self { pool })
  }

  pub fn from_pool(pool: PgPool) -> Self {
    Self { pool }
  }

  /// Creates missing tables and indexes. Safe to run on every start.
  pub async fn ensure_schema(&self) -> Result<()> {
    sqlx::raw_sql(SCHEMA_SQL).execute(&self.pool).await?;
    info!("Database schema verified.");
    Ok(())
  }
}

#[async_trait]
impl Storage for PgStorage {
  #[instrument(skip(self))]
  async fn get_user(&self, id: i32) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT id, username, password, is_seller FROM users WHERE id = $1")
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(user)
  }

  #[instrument(skip(self))]
  async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT id, username, password, is_seller FROM users WHERE username = $1")
      .bind(username)
      .fetch_optional(&self.pool)
      .await?;
    Ok(user)
  }

  #[instrument(skip(self, user), fields(username = %user.username))]
  async fn create_user(&self, user: NewUser) -> Result<User> {
    let inserted = sqlx::query_as::<_, User>(
      "INSERT INTO users (username, password, is_seller) VALUES ($1, $2, $3) \
       RETURNING id, username, password, is_seller",
    )
    .bind(&user.username)
    .bind(&user.password_hash)
    .bind(user.is_seller)
    .fetch_one(&self.pool)
    .await;

    match inserted {
      Ok(row) => Ok(row),
      Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
        Err(AppError::Conflict("Username already exists".to_string()))
      }
      Err(e) => Err(e.into()),
    }
  }

  #[instrument(skip(self))]
  async fn list_products(&self) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(
      "SELECT id, title, description, price, image_url, seller_id FROM products ORDER BY id",
    )
    .fetch_all(&self.pool)
    .await?;
    Ok(products)
  }

  #[instrument(skip(self, product), fields(seller_id = product.seller_id))]
  async fn create_product(&self, product: NewProduct) -> Result<Product> {
    let created = sqlx::query_as::<_, Product>(
      "INSERT INTO products (title, description, price, image_url, seller_id) VALUES ($1, $2, $3, $4, $5) \
       RETURNING id, title, description, price, image_url, seller_id",
    )
    .bind(&product.title)
    .bind(&product.description)
    .bind(product.price)
    .bind(&product.image_url)
    .bind(product.seller_id)
    .fetch_one(&self.pool)
    .await?;
    Ok(created)
  }

  #[instrument(skip(self))]
  async fn list_cart_lines(&self, user_id: i32) -> Result<Vec<CartLine>> {
    let rows = sqlx::query_as::<_, CartLineRow>(
      "SELECT c.id, c.user_id, c.product_id, c.quantity, \
              p.title, p.description, p.price, p.image_url, p.seller_id \
       FROM cart_items c \
       INNER JOIN products p ON p.id = c.product_id \
       WHERE c.user_id = $1 \
       ORDER BY c.id",
    )
    .bind(user_id)
    .fetch_all(&self.pool)
    .await?;
    Ok(rows.into_iter().map(CartLine::from).collect())
  }

  #[instrument(skip(self, item), fields(user_id = item.user_id, product_id = item.product_id))]
  async fn add_cart_item(&self, item: NewCartItem) -> Result<CartItem> {
    let created = sqlx::query_as::<_, CartItem>(
      "INSERT INTO cart_items (user_id, product_id, quantity) VALUES ($1, $2, $3) \
       RETURNING id, user_id, product_id, quantity",
    )
    .bind(item.user_id)
    .bind(item.product_id)
    .bind(item.quantity)
    .fetch_one(&self.pool)
    .await?;
    Ok(created)
  }

  #[instrument(skip(self))]
  async fn remove_cart_item(&self, id: i32) -> Result<()> {
    sqlx::query("DELETE FROM cart_items WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  #[instrument(skip(self))]
  async fn clear_cart(&self, user_id: i32) -> Result<()> {
    sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
      .bind(user_id)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  #[instrument(skip(self, order), fields(user_id = order.user_id, total = order.total))]
  async fn create_order(&self, order: NewOrder) -> Result<Order> {
    let row = sqlx::query_as::<_, OrderRow>(
      "INSERT INTO orders (user_id, total, status) VALUES ($1, $2, $3) \
       RETURNING id, user_id, total, status, created_at",
    )
    .bind(order.user_id)
    .bind(order.total)
    .bind(order.status.as_str())
    .fetch_one(&self.pool)
    .await?;
    Order::try_from(row)
  }

  #[instrument(skip(self, session), fields(user_id = session.user_id))]
  async fn create_session(&self, session: Session) -> Result<()> {
    sqlx::query("INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES ($1, $2, $3, $4)")
      .bind(&session.token)
      .bind(session.user_id)
      .bind(session.created_at)
      .bind(session.expires_at)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  #[instrument(skip_all)]
  async fn find_session(&self, token: &str) -> Result<Option<Session>> {
    let session = sqlx::query_as::<_, Session>(
      "SELECT token, user_id, created_at, expires_at FROM sessions WHERE token = $1",
    )
    .bind(token)
    .fetch_optional(&self.pool)
    .await?;
    Ok(session)
  }

  #[instrument(skip_all)]
  async fn delete_session(&self, token: &str) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
      .bind(token)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  #[instrument(skip(self))]
  async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
      .bind(now)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected())
  }
}
