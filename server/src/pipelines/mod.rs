// bazaar/server/src/pipelines/mod.rs

//! Business workflows, each a pipeline registered by its context data type.

use crate::errors::AppError;
use bazaar_flow::Workflows;

pub mod common_steps;
pub mod contexts;

pub mod cart_pipeline;
pub mod catalog_pipeline;
pub mod checkout_pipeline;
pub mod signin_pipeline;
pub mod signup_pipeline;

/// Called once while building `AppState`.
pub fn register_all_pipelines(workflows: &Workflows<AppError>) {
  tracing::info!("Registering application pipelines...");

  signup_pipeline::register_signup_pipeline(workflows);
  signin_pipeline::register_signin_pipeline(workflows);
  catalog_pipeline::register_catalog_pipeline(workflows);
  cart_pipeline::register_add_to_cart_pipeline(workflows);
  checkout_pipeline::register_checkout_pipeline(workflows);

  tracing::info!("All application pipelines registered.");
}
