// bazaar/server/src/pipelines/cart_pipeline.rs

use crate::errors::AppError;
use crate::models::{AddToCartInput, NewCartItem};
use crate::pipelines::common_steps;
use crate::pipelines::contexts::AddToCartCtxData;
use bazaar_flow::{ContextData, Pipeline, PipelineControl, Workflows};
use tracing::info;

/// Add-to-cart. Every call appends a row; product existence is not checked.
pub fn register_add_to_cart_pipeline(workflows: &Workflows<AppError>) {
  let mut p = Pipeline::<AddToCartCtxData, AppError>::new(&[
    ("require_caller", false),
    ("parse_cart_input", false),
    ("insert_cart_item", false),
  ]);

  // Step 1: A session is required before the body is even looked at.
  p.on_root("require_caller", common_steps::require_caller_step::<AddToCartCtxData>);

  // Step 2: Quantity defaults to 1 and must be at least 1.
  p.on_root("parse_cart_input", |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let raw_body = { ctx_data.read().raw_body.clone() };
      let input: AddToCartInput = serde_json::from_slice(&raw_body)
        .map_err(|e| AppError::Validation(format!("Invalid cart body: {}", e)))?;
      input.validate()?;
      ctx_data.write().input = Some(input);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 3: Append a new row for the caller.
  p.on_root("insert_cart_item", |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let (new_item, storage) = {
        let mut guard = ctx_data.write();
        let user_id = guard.caller.as_ref().map(|u| u.id);
        match (guard.input.take(), user_id) {
          (Some(input), Some(user_id)) => (
            NewCartItem {
              user_id,
              product_id: input.product_id,
              quantity: input.quantity,
            },
            guard.app_state.storage.clone(),
          ),
          _ => return Err(AppError::Internal("Cart input or caller missing before insert".to_string())),
        }
      };

      let item = storage.add_cart_item(new_item).await?;
      info!(cart_item_id = item.id, product_id = item.product_id, quantity = item.quantity, "Cart item added.");
      ctx_data.write().item = Some(item);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  workflows.register(p);
  tracing::info!("Add-to-cart pipeline registered.");
}
