// bazaar/server/src/pipelines/checkout_pipeline.rs

//! Checkout: turns the caller's cart into a completed order, then empties the cart.
//!
//! The steps are separate storage calls with no transaction around them. If clearing
//! the cart fails after the order is written, the error surfaces and the cart stays.

use crate::errors::{AppError, Result};
use crate::models::{CartLine, NewOrder, OrderStatus};
use crate::pipelines::common_steps;
use crate::pipelines::contexts::CheckoutCtxData;
use bazaar_flow::{ContextData, Pipeline, PipelineControl, Workflows};
use tracing::{debug, info, warn};

/// Σ(price × quantity), failing on overflow.
pub fn cart_total(lines: &[CartLine]) -> Result<i64> {
  lines.iter().try_fold(0i64, |acc, line| {
    line
      .product
      .price
      .checked_mul(i64::from(line.item.quantity))
      .and_then(|subtotal| acc.checked_add(subtotal))
      .ok_or_else(|| AppError::Internal("Cart total overflowed".to_string()))
  })
}

/// Registers the five checkout steps, run in order against `CheckoutCtxData`.
pub fn register_checkout_pipeline(workflows: &Workflows<AppError>) {
  let mut p = Pipeline::<CheckoutCtxData, AppError>::new(&[
    ("require_caller", false),
    ("load_cart", false),
    ("compute_total", false),
    ("create_order", false),
    ("clear_cart", false),
  ]);

  // Step 1: Checkout needs a session.
  p.on_root("require_caller", common_steps::require_caller_step::<CheckoutCtxData>);

  // Step 2: Read the cart with current prices; an empty cart ends the run with 400.
  p.on_root("load_cart", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (user_id, storage) = {
        let guard = ctx_data.read();
        (guard.caller.as_ref().map(|u| u.id), guard.app_state.storage.clone())
      };
      let Some(user_id) = user_id else {
        return Err(AppError::Unauthenticated);
      };

      let lines = storage.list_cart_lines(user_id).await?;
      if lines.is_empty() {
        warn!(user_id, "Checkout attempted with an empty cart.");
        return Err(AppError::EmptyCart);
      }
      debug!(user_id, line_count = lines.len(), "Cart loaded for checkout.");
      ctx_data.write().cart_lines = lines;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 3: Snapshot the total from the lines just loaded.
  p.on_root("compute_total", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let total = {
        let mut guard = ctx_data.write();
        let total = cart_total(&guard.cart_lines)?;
        guard.total = Some(total);
        total
      };
      debug!(total, "Checkout total computed.");
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 4: Write the completed order.
  p.on_root("create_order", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (new_order, storage) = {
        let guard = ctx_data.read();
        match (guard.caller.as_ref(), guard.total) {
          (Some(user), Some(total)) => (
            NewOrder {
              user_id: user.id,
              total,
              status: OrderStatus::Completed,
            },
            guard.app_state.storage.clone(),
          ),
          _ => return Err(AppError::Internal("Caller or total missing before order creation".to_string())),
        }
      };

      let order = storage.create_order(new_order).await?;
      info!(order_id = order.id, user_id = order.user_id, total = order.total, "Order created.");
      ctx_data.write().order = Some(order);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 5: Empty the cart. No compensation if this fails after the order exists.
  p.on_root("clear_cart", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (user_id, storage) = {
        let guard = ctx_data.read();
        (guard.order.as_ref().map(|o| o.user_id), guard.app_state.storage.clone())
      };
      let Some(user_id) = user_id else {
        return Err(AppError::Internal("Order missing before clearing cart".to_string()));
      };

      storage.clear_cart(user_id).await?;
      debug!(user_id, "Cart cleared after checkout.");
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  workflows.register(p);
  tracing::info!("Checkout pipeline registered.");
}
