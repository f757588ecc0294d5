// bazaar/server/src/pipelines/signup_pipeline.rs

use crate::errors::AppError;
use crate::models::NewUser;
use crate::pipelines::common_steps;
use crate::pipelines::contexts::RegisterCtxData;
use bazaar_flow::{ContextData, Pipeline, PipelineControl, Workflows};
use tracing::{event, info, warn, Level};

/// Registration: validate, reject taken usernames, hash, persist, then log the new user in.
pub fn register_signup_pipeline(workflows: &Workflows<AppError>) {
  let mut p = Pipeline::<RegisterCtxData, AppError>::new(&[
    ("validate_register_input", false),
    ("check_existing_username", false),
    ("hash_password", false),
    ("create_user_record", false),
    ("open_session", false),
  ]);

  // Step 1: Both fields must be non-empty; no other password policy applies.
  p.on_root("validate_register_input", |ctx_data: ContextData<RegisterCtxData>| {
    Box::pin(async move {
      let (username_empty, password_empty) = {
        let guard = ctx_data.read();
        (guard.username.is_empty(), guard.password.is_empty())
      };
      if username_empty || password_empty {
        warn!("Registration rejected: username or password missing.");
        return Err(AppError::Validation("Username and password are required".to_string()));
      }
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 2: Reject taken usernames before paying for a hash. The insert still maps a
  // racing unique violation to Conflict.
  p.on_root("check_existing_username", |ctx_data: ContextData<RegisterCtxData>| {
    Box::pin(async move {
      let (username, storage) = {
        let guard = ctx_data.read();
        (guard.username.clone(), guard.app_state.storage.clone())
      };

      if storage.get_user_by_username(&username).await?.is_some() {
        warn!(%username, "Registration attempted with an existing username.");
        return Err(AppError::Conflict("Username already exists".to_string()));
      }
      event!(Level::DEBUG, %username, "Username is available.");
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 3: Derive the credential on the blocking pool.
  p.on_root("hash_password", |ctx_data: ContextData<RegisterCtxData>| {
    Box::pin(async move {
      let (password, hasher) = {
        let guard = ctx_data.read();
        (guard.password.clone(), guard.app_state.hasher.clone())
      };

      let hashed = tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))??;

      ctx_data.write().password_hash = Some(hashed);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 4: Persist the user and keep it in the context for the response.
  p.on_root("create_user_record", |ctx_data: ContextData<RegisterCtxData>| {
    Box::pin(async move {
      let (new_user, storage) = {
        let guard = ctx_data.read();
        let Some(password_hash) = guard.password_hash.clone() else {
          return Err(AppError::Internal("Password hash missing before user creation".to_string()));
        };
        (
          NewUser {
            username: guard.username.clone(),
            password_hash,
            is_seller: guard.is_seller,
          },
          guard.app_state.storage.clone(),
        )
      };

      let user = storage.create_user(new_user).await?;
      info!(user_id = user.id, username = %user.username, is_seller = user.is_seller, "User registered.");
      ctx_data.write().user = Some(user);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 5: Log the new user in.
  p.on_root("open_session", common_steps::open_session_step::<RegisterCtxData>);

  workflows.register(p);
  tracing::info!("Sign-up pipeline registered.");
}
