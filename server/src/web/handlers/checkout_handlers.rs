// bazaar/server/src/web/handlers/checkout_handlers.rs

use actix_web::{web, HttpResponse};
use bazaar_flow::ContextData;
use tracing::{info, instrument};

use super::ensure_completed;
use crate::errors::AppError;
use crate::pipelines::contexts::CheckoutCtxData;
use crate::state::AppState;
use crate::web::session::Caller;

#[instrument(name = "handler::checkout", skip_all, fields(caller_id = caller.user().map(|u| u.id)))]
pub async fn checkout_handler(app_state: web::Data<AppState>, caller: Caller) -> Result<HttpResponse, AppError> {
  let ctx_data = ContextData::new(CheckoutCtxData::new(app_state.get_ref().clone(), caller.into_user()));

  let result = app_state.workflows.run(ctx_data.clone()).await?;
  ensure_completed(result, "Checkout")?;

  let order = { ctx_data.write().order.take() };
  let order = order.ok_or_else(|| AppError::Internal("Checkout completed without an order".to_string()))?;
  info!(order_id = order.id, total = order.total, "Checkout complete.");
  Ok(HttpResponse::Ok().json(order))
}
