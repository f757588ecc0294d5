// bazaar/server/src/state.rs

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::pipelines;
use crate::services::auth_service::CredentialHasher;
use crate::storage::Storage;
use bazaar_flow::Workflows;
use std::sync::Arc;

/// Shared by every worker. Cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
  pub storage: Arc<dyn Storage>,
  pub hasher: Arc<dyn CredentialHasher>,
  pub workflows: Arc<Workflows<AppError>>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  /// Builds the state and registers every application pipeline.
  pub fn new(storage: Arc<dyn Storage>, hasher: Arc<dyn CredentialHasher>, config: AppConfig) -> Self {
    let workflows = Arc::new(Workflows::<AppError>::new());
    pipelines::register_all_pipelines(&workflows);
    Self {
      storage,
      hasher,
      workflows,
      config: Arc::new(config),
    }
  }
}
