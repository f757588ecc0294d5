// bazaar/server/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use bazaar_flow::ContextData;
use tracing::{debug, instrument};

use super::ensure_completed;
use crate::errors::AppError;
use crate::pipelines::contexts::CreateProductCtxData;
use crate::state::AppState;
use crate::web::session::Caller;

#[instrument(name = "handler::list_products", skip_all)]
pub async fn list_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products = app_state.storage.list_products().await?;
  debug!(count = products.len(), "Listing products.");
  Ok(HttpResponse::Ok().json(products))
}

/// The body is taken raw so a non-seller gets 403 whatever they send.
#[instrument(name = "handler::create_product", skip_all, fields(caller_id = caller.user().map(|u| u.id)))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  caller: Caller,
  body: web::Bytes,
) -> Result<HttpResponse, AppError> {
  let ctx_data = ContextData::new(CreateProductCtxData::new(
    app_state.get_ref().clone(),
    caller.into_user(),
    body,
  ));

  let result = app_state.workflows.run(ctx_data.clone()).await?;
  ensure_completed(result, "Product creation")?;

  let product = { ctx_data.write().product.take() };
  let product = product.ok_or_else(|| AppError::Internal("Product pipeline completed without a product".to_string()))?;
  Ok(HttpResponse::Created().json(product))
}
