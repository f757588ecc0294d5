// bazaar/server/src/web/handlers/mod.rs

pub mod auth_handlers;
pub mod cart_handlers;
pub mod checkout_handlers;
pub mod product_handlers;

use crate::errors::AppError;
use bazaar_flow::PipelineResult;
use tracing::warn;

/// Every pipeline here signals failure with an error, so a stop is unexpected.
pub(crate) fn ensure_completed(result: PipelineResult, workflow: &str) -> Result<(), AppError> {
  match result {
    PipelineResult::Completed => Ok(()),
    PipelineResult::Stopped => {
      warn!(workflow, "Pipeline was stopped by a handler.");
      Err(AppError::Internal(format!("{} was halted by an internal step", workflow)))
    }
  }
}
