// bazaar/server/src/pipelines/signin_pipeline.rs

use crate::errors::AppError;
use crate::pipelines::common_steps;
use crate::pipelines::contexts::LoginCtxData;
use bazaar_flow::{ContextData, Pipeline, PipelineControl, Workflows};
use tracing::{info, warn};

const BAD_CREDENTIALS: &str = "Invalid username or password";

/// Login: look up the user, check the password, then open a session.
pub fn register_signin_pipeline(workflows: &Workflows<AppError>) {
  let mut p = Pipeline::<LoginCtxData, AppError>::new(&[
    ("validate_login_input", false),
    ("fetch_user_by_username", false),
    ("verify_password", false),
    ("open_session", false),
  ]);

  // Step 1: Missing credentials are a 400, not an authentication failure.
  p.on_root("validate_login_input", |ctx_data: ContextData<LoginCtxData>| {
    Box::pin(async move {
      let missing = {
        let guard = ctx_data.read();
        guard.username.is_empty() || guard.password.is_empty()
      };
      if missing {
        return Err(AppError::Validation("Username and password are required".to_string()));
      }
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 2: Unknown usernames fail with the same message as a wrong password.
  p.on_root("fetch_user_by_username", |ctx_data: ContextData<LoginCtxData>| {
    Box::pin(async move {
      let (username, storage) = {
        let guard = ctx_data.read();
        (guard.username.clone(), guard.app_state.storage.clone())
      };

      match storage.get_user_by_username(&username).await? {
        Some(user) => {
          ctx_data.write().user = Some(user);
          Ok(PipelineControl::Continue)
        }
        None => {
          warn!(%username, "Login attempted for unknown username.");
          Err(AppError::Unauthorized(BAD_CREDENTIALS.to_string()))
        }
      }
    })
  });

  // Step 3: Recompute with the stored salt and compare in constant time.
  p.on_root("verify_password", |ctx_data: ContextData<LoginCtxData>| {
    Box::pin(async move {
      let (stored, candidate, hasher) = {
        let guard = ctx_data.read();
        let stored = guard.user.as_ref().map(|u| u.password_hash.clone()).unwrap_or_default();
        (stored, guard.password.clone(), guard.app_state.hasher.clone())
      };

      let matches = tokio::task::spawn_blocking(move || hasher.verify(&stored, &candidate))
        .await
        .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))??;

      if !matches {
        // Forget the looked-up user so a later step cannot log them in.
        let username = {
          let mut guard = ctx_data.write();
          guard.user = None;
          guard.username.clone()
        };
        warn!(%username, "Login rejected: password mismatch.");
        return Err(AppError::Unauthorized(BAD_CREDENTIALS.to_string()));
      }
      info!("Password verified.");
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 4: Issue the session cookie token.
  p.on_root("open_session", common_steps::open_session_step::<LoginCtxData>);

  workflows.register(p);
  tracing::info!("Sign-in pipeline registered.");
}
