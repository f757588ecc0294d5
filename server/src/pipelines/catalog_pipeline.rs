// bazaar/server/src/pipelines/catalog_pipeline.rs

use crate::errors::AppError;
use crate::models::ProductInput;
use crate::pipelines::contexts::CreateProductCtxData;
use bazaar_flow::{ContextData, Pipeline, PipelineControl, Workflows};
use tracing::{info, warn};

/// Product creation. Authorization runs before the body is parsed.
pub fn register_catalog_pipeline(workflows: &Workflows<AppError>) {
  let mut p = Pipeline::<CreateProductCtxData, AppError>::new(&[
    ("authorize_seller", false),
    ("parse_product_input", false),
    ("insert_product", false),
  ]);

  // Step 1: Only sellers may list products; anonymous callers get the same 403.
  p.on_root("authorize_seller", |ctx_data: ContextData<CreateProductCtxData>| {
    Box::pin(async move {
      let caller = {
        let guard = ctx_data.read();
        guard.caller.as_ref().map(|u| (u.id, u.is_seller))
      };
      match caller {
        Some((_, true)) => Ok(PipelineControl::Continue),
        Some((user_id, false)) => {
          warn!(user_id, "Non-seller attempted to create a product.");
          Err(AppError::Forbidden)
        }
        None => {
          warn!("Anonymous request attempted to create a product.");
          Err(AppError::Forbidden)
        }
      }
    })
  });

  // Step 2: Parse and validate the raw body now that the caller is authorized.
  p.on_root("parse_product_input", |ctx_data: ContextData<CreateProductCtxData>| {
    Box::pin(async move {
      let raw_body = { ctx_data.read().raw_body.clone() };
      let input: ProductInput = serde_json::from_slice(&raw_body)
        .map_err(|e| AppError::Validation(format!("Invalid product body: {}", e)))?;
      input.validate()?;
      ctx_data.write().input = Some(input);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 3: Persist with the caller as seller, ignoring any client-sent sellerId.
  p.on_root("insert_product", |ctx_data: ContextData<CreateProductCtxData>| {
    Box::pin(async move {
      let (new_product, storage) = {
        let mut guard = ctx_data.write();
        let seller_id = guard.caller.as_ref().map(|u| u.id);
        match (guard.input.take(), seller_id) {
          (Some(input), Some(seller_id)) => (input.into_new_product(seller_id), guard.app_state.storage.clone()),
          _ => return Err(AppError::Internal("Product input or seller missing before insert".to_string())),
        }
      };

      let product = storage.create_product(new_product).await?;
      info!(product_id = product.id, seller_id = product.seller_id, "Product created.");
      ctx_data.write().product = Some(product);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  workflows.register(p);
  tracing::info!("Catalog pipeline registered.");
}
