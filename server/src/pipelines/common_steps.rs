// bazaar/server/src/pipelines/common_steps.rs

//! Steps shared by several pipelines, generic over the context traits.

use crate::errors::{AppError, Result as AppResult};
use crate::pipelines::contexts::{CallerScoped, SessionIssuing};
use crate::services::session_service;
use bazaar_flow::{ContextData, PipelineControl};
use tracing::{debug, error, instrument, warn};

/// Fails with `Unauthenticated` unless the request resolved to a user.
#[instrument(name = "common_step::require_caller", skip(ctx_data), err(Display))]
pub async fn require_caller_step<T>(ctx_data: ContextData<T>) -> AppResult<PipelineControl>
where
  T: CallerScoped + Send + Sync + 'static,
{
  let caller_id = { ctx_data.read().caller().map(|u| u.id) };
  match caller_id {
    Some(user_id) => {
      debug!(user_id, "Caller present.");
      Ok(PipelineControl::Continue)
    }
    None => {
      warn!("Request requires an authenticated caller.");
      Err(AppError::Unauthenticated)
    }
  }
}

/// Persists a session for the user resolved by earlier steps and stores it in the context.
#[instrument(name = "common_step::open_session", skip(ctx_data), err(Display))]
pub async fn open_session_step<T>(ctx_data: ContextData<T>) -> AppResult<PipelineControl>
where
  T: SessionIssuing + Send + Sync + 'static,
{
  let (user_id, storage, ttl) = {
    let guard = ctx_data.read();
    let state = guard.app_state();
    (guard.session_user_id(), state.storage.clone(), state.config.session_ttl())
  };
  let Some(user_id) = user_id else {
    error!("open_session reached without a resolved user.");
    return Err(AppError::Internal("No user to open a session for".to_string()));
  };

  let session = session_service::open_session(storage.as_ref(), user_id, ttl).await?;
  ctx_data.write().set_session(session);
  Ok(PipelineControl::Continue)
}
