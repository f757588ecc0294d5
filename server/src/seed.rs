// bazaar/server/src/seed.rs

//! Demo catalog fixture, applied at startup when `SEED_DB=true`.

use crate::errors::Result;
use crate::models::{NewProduct, NewUser};
use crate::services::auth_service::CredentialHasher;
use crate::storage::Storage;
use tracing::{info, instrument};

pub const SEED_SELLER_USERNAME: &str = "seller";

const DEMO_PRODUCTS: [(&str, &str, i64, &str); 3] = [
  (
    "Mechanical Keyboard",
    "Clicky and tactile",
    12000,
    "https://images.unsplash.com/photo-1595225476474-87563907a212?w=800&q=80",
  ),
  (
    "Wireless Mouse",
    "Ergonomic design",
    5000,
    "https://images.unsplash.com/photo-1527864550417-7fd91fc51a46?w=800&q=80",
  ),
  (
    "Gaming Headset",
    "Surround sound",
    8000,
    "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=800&q=80",
  ),
];

/// Inserts the demo seller and products unless the catalog already has products.
/// Returns whether anything was written.
#[instrument(skip_all)]
pub async fn seed_demo_catalog(storage: &dyn Storage, hasher: &dyn CredentialHasher, seller_password: &str) -> Result<bool> {
  if !storage.list_products().await?.is_empty() {
    info!("Catalog already populated; skipping seed.");
    return Ok(false);
  }

  let seller = match storage.get_user_by_username(SEED_SELLER_USERNAME).await? {
    Some(existing) => existing,
    None => {
      storage
        .create_user(NewUser {
          username: SEED_SELLER_USERNAME.to_string(),
          password_hash: hasher.hash(seller_password)?,
          is_seller: true,
        })
        .await?
    }
  };

  for (title, description, price, image_url) in DEMO_PRODUCTS {
    storage
      .create_product(NewProduct {
        title: title.to_string(),
        description: description.to_string(),
        price,
        image_url: image_url.to_string(),
        seller_id: seller.id,
      })
      .await?;
  }
  info!(seller_id = seller.id, products = DEMO_PRODUCTS.len(), "Demo catalog seeded.");
  Ok(true)
}
