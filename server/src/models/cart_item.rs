// bazaar/server/src/models/cart_item.rs

use crate::errors::{AppError, Result};
use crate::models::product::Product;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
  pub id: i32,
  pub user_id: i32,
  pub product_id: i32,
  pub quantity: i32,
}

/// A cart row joined with the product as it is at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
  #[serde(flatten)]
  pub item: CartItem,
  pub product: Product,
}

#[derive(Debug, Clone)]
pub struct NewCartItem {
  pub user_id: i32,
  pub product_id: i32,
  pub quantity: i32,
}

fn default_quantity() -> i32 {
  1
}

/// Body of `POST /api/cart`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartInput {
  pub product_id: i32,
  #[serde(default = "default_quantity")]
  pub quantity: i32,
}

impl AddToCartInput {
  pub fn validate(&self) -> Result<()> {
    if self.quantity < 1 {
      return Err(AppError::Validation("quantity must be at least 1".to_string()));
    }
    Ok(())
  }
}
