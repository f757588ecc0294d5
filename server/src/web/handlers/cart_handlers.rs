// bazaar/server/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use bazaar_flow::ContextData;
use tracing::{info, instrument};

use super::ensure_completed;
use crate::errors::AppError;
use crate::pipelines::contexts::AddToCartCtxData;
use crate::state::AppState;
use crate::web::session::Caller;

#[instrument(name = "handler::get_cart", skip_all)]
pub async fn get_cart_handler(app_state: web::Data<AppState>, caller: Caller) -> Result<HttpResponse, AppError> {
  let user = caller.require()?;
  let lines = app_state.storage.list_cart_lines(user.id).await?;
  Ok(HttpResponse::Ok().json(lines))
}

#[instrument(name = "handler::add_to_cart", skip_all, fields(caller_id = caller.user().map(|u| u.id)))]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  caller: Caller,
  body: web::Bytes,
) -> Result<HttpResponse, AppError> {
  let ctx_data = ContextData::new(AddToCartCtxData::new(
    app_state.get_ref().clone(),
    caller.into_user(),
    body,
  ));

  let result = app_state.workflows.run(ctx_data.clone()).await?;
  ensure_completed(result, "Add to cart")?;

  let item = { ctx_data.write().item.take() };
  let item = item.ok_or_else(|| AppError::Internal("Cart pipeline completed without an item".to_string()))?;
  Ok(HttpResponse::Ok().json(item))
}

/// Deletes by item id. The item is not checked against the caller.
#[instrument(name = "handler::remove_from_cart", skip_all, fields(item_id = %item_id))]
pub async fn remove_from_cart_handler(
  app_state: web::Data<AppState>,
  caller: Caller,
  item_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let user = caller.require()?;
  let item_id = item_id
    .parse::<i32>()
    .map_err(|_| AppError::Validation(format!("Invalid cart item id '{}'", item_id.as_str())))?;

  app_state.storage.remove_cart_item(item_id).await?;
  info!(user_id = user.id, item_id, "Cart item removed.");
  Ok(HttpResponse::Ok().finish())
}
