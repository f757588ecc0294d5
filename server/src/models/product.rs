// bazaar/server/src/models/product.rs

use crate::errors::{AppError, Result};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: i32,
  pub title: String,
  pub description: String,
  /// Minor currency units.
  pub price: i64,
  pub image_url: String,
  pub seller_id: i32,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
  pub title: String,
  pub description: String,
  pub price: i64,
  pub image_url: String,
  pub seller_id: i32,
}

/// Body of `POST /api/products`. A client-sent `sellerId` is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
  pub title: String,
  pub description: String,
  pub price: i64,
  pub image_url: String,
}

impl ProductInput {
  pub fn validate(&self) -> Result<()> {
    for (field, value) in [
      ("title", &self.title),
      ("description", &self.description),
      ("imageUrl", &self.image_url),
    ] {
      if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} must not be empty", field)));
      }
    }
    if self.price < 0 {
      return Err(AppError::Validation("price must be a non-negative integer".to_string()));
    }
    Ok(())
  }

  pub fn into_new_product(self, seller_id: i32) -> NewProduct {
    NewProduct {
      title: self.title,
      description: self.description,
      price: self.price,
      image_url: self.image_url,
      seller_id,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn input() -> ProductInput {
    ProductInput {
      title: "Wireless Mouse".to_string(),
      description: "Ergonomic design".to_string(),
      price: 5000,
      image_url: "https://img.example/mouse.jpg".to_string(),
    }
  }

  #[test]
  fn accepts_free_product() {
    let free = ProductInput { price: 0, ..input() };
    assert!(free.validate().is_ok());
  }

  #[test]
  fn rejects_negative_price_and_blank_fields() {
    let negative = ProductInput { price: -1, ..input() };
    assert!(matches!(negative.validate(), Err(AppError::Validation(_))));

    let blank = ProductInput {
      image_url: "   ".to_string(),
      ..input()
    };
    match blank.validate() {
      Err(AppError::Validation(msg)) => assert!(msg.contains("imageUrl")),
      other => panic!("expected validation error, got {:?}", other),
    }
  }

  #[test]
  fn seller_id_comes_from_caller() {
    let json = r#"{"title":"t","description":"d","price":1,"imageUrl":"u","sellerId":999}"#;
    let parsed: ProductInput = serde_json::from_str(json).unwrap();
    assert_eq!(parsed.into_new_product(7).seller_id, 7);
  }

  #[test]
  fn fractional_price_does_not_parse() {
    let json = r#"{"title":"t","description":"d","price":12.5,"imageUrl":"u"}"#;
    assert!(serde_json::from_str::<ProductInput>(json).is_err());
  }
}
