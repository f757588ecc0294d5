// bazaar/server/src/web/session.rs

//! Resolves the caller from the session cookie and builds the cookies that carry it.

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::User;
use crate::services::session_service;
use crate::state::AppState;
use actix_web::cookie::{time, Cookie, SameSite};
use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use chrono::Utc;
use futures_util::future::LocalBoxFuture;
use tracing::{debug, error};

/// The optional authenticated user behind a request.
///
/// Extraction never rejects for a missing or stale session; handlers decide
/// how an anonymous caller is treated.
#[derive(Debug, Clone, Default)]
pub struct Caller {
  user: Option<User>,
  token: Option<String>,
}

impl Caller {
  pub fn user(&self) -> Option<&User> {
    self.user.as_ref()
  }

  /// Raw cookie token, present even when it no longer maps to a live session.
  pub fn token(&self) -> Option<&str> {
    self.token.as_deref()
  }

  pub fn into_user(self) -> Option<User> {
    self.user
  }

  /// The user, or `Unauthenticated`.
  pub fn require(self) -> Result<User, AppError> {
    self.user.ok_or(AppError::Unauthenticated)
  }
}

impl FromRequest for Caller {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let state = req.app_data::<web::Data<AppState>>().cloned();
    let token = state
      .as_ref()
      .and_then(|s| req.cookie(&s.config.session_cookie_name))
      .map(|c| c.value().to_string())
      .filter(|t| !t.is_empty());

    Box::pin(async move {
      let Some(state) = state else {
        error!("AppState missing from app data; cannot resolve caller.");
        return Err(AppError::Internal("Application state not configured".to_string()));
      };
      let Some(token) = token else {
        return Ok(Caller::default());
      };

      let user = match session_service::resolve_session(state.storage.as_ref(), &token, Utc::now()).await? {
        Some(session) => state.storage.get_user(session.user_id).await?,
        None => None,
      };
      debug!(authenticated = user.is_some(), "Caller resolved from session cookie.");
      Ok(Caller {
        user,
        token: Some(token),
      })
    })
  }
}

pub fn session_cookie(config: &AppConfig, token: &str) -> Cookie<'static> {
  Cookie::build(config.session_cookie_name.clone(), token.to_string())
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .secure(config.session_cookie_secure)
    .max_age(time::Duration::seconds(config.session_ttl().num_seconds()))
    .finish()
}

/// An already-expired cookie that makes the client drop its session token.
pub fn removal_cookie(config: &AppConfig) -> Cookie<'static> {
  let mut cookie = Cookie::build(config.session_cookie_name.clone(), "")
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .secure(config.session_cookie_secure)
    .finish();
  cookie.make_removal();
  cookie
}
