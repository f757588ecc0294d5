// bazaar/server/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use bazaar_flow::ContextData;
use serde::Deserialize;
use tracing::{info, instrument};

use super::ensure_completed;
use crate::errors::AppError;
use crate::pipelines::contexts::{LoginCtxData, RegisterCtxData};
use crate::services::session_service;
use crate::state::AppState;
use crate::web::session::{removal_cookie, session_cookie, Caller};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
  pub username: String,
  pub password: String,
  #[serde(default)]
  pub is_seller: bool,
}

#[derive(Deserialize)]
pub struct LoginPayload {
  pub username: String,
  pub password: String,
}

#[instrument(name = "handler::register", skip_all, fields(username = %payload.username))]
pub async fn register_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<RegisterPayload>,
) -> Result<HttpResponse, AppError> {
  let RegisterPayload {
    username,
    password,
    is_seller,
  } = payload.into_inner();
  let ctx_data = ContextData::new(RegisterCtxData::new(app_state.get_ref().clone(), username, password, is_seller));

  let result = app_state.workflows.run(ctx_data.clone()).await?;
  ensure_completed(result, "Registration")?;

  let (user, session) = {
    let mut guard = ctx_data.write();
    (guard.user.take(), guard.session.take())
  };
  match (user, session) {
    (Some(user), Some(session)) => {
      info!(user_id = user.id, "Registration complete; session issued.");
      Ok(
        HttpResponse::Created()
          .cookie(session_cookie(&app_state.config, &session.token))
          .json(user),
      )
    }
    _ => Err(AppError::Internal("Registration completed without a user or session".to_string())),
  }
}

#[instrument(name = "handler::login", skip_all, fields(username = %payload.username))]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<LoginPayload>,
) -> Result<HttpResponse, AppError> {
  let LoginPayload { username, password } = payload.into_inner();
  let ctx_data = ContextData::new(LoginCtxData::new(app_state.get_ref().clone(), username, password));

  let result = app_state.workflows.run(ctx_data.clone()).await?;
  ensure_completed(result, "Login")?;

  let (user, session) = {
    let mut guard = ctx_data.write();
    (guard.user.take(), guard.session.take())
  };
  match (user, session) {
    (Some(user), Some(session)) => {
      info!(user_id = user.id, "Login successful.");
      Ok(
        HttpResponse::Ok()
          .cookie(session_cookie(&app_state.config, &session.token))
          .json(user),
      )
    }
    _ => Err(AppError::Internal("Login completed without a user or session".to_string())),
  }
}

/// Always succeeds; a missing or stale session just gets its cookie cleared.
#[instrument(name = "handler::logout", skip_all)]
pub async fn logout_handler(app_state: web::Data<AppState>, caller: Caller) -> Result<HttpResponse, AppError> {
  if let Some(token) = caller.token() {
    session_service::close_session(app_state.storage.as_ref(), token).await?;
    info!(had_user = caller.user().is_some(), "Session closed.");
  }
  Ok(HttpResponse::Ok().cookie(removal_cookie(&app_state.config)).finish())
}

#[instrument(name = "handler::current_user", skip_all)]
pub async fn current_user_handler(caller: Caller) -> Result<HttpResponse, AppError> {
  let user = caller.require()?;
  Ok(HttpResponse::Ok().json(user))
}
