// tests/common/mod.rs
#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use bazaar::config::AppConfig;
use bazaar::services::auth_service::Argon2Hasher;
use bazaar::state::AppState;
use bazaar::storage::MemoryStorage;
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use std::sync::Arc;

pub const COOKIE_NAME: &str = "bazaar.sid";

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::new("warn"))
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

/// Memory-backed state with cheap hashing. The storage handle is returned for inspection.
pub fn test_state() -> (AppState, Arc<MemoryStorage>) {
  setup_tracing();
  let config = AppConfig::from_lookup(|name| match name {
    "STORAGE" => Some("memory".to_string()),
    _ => None,
  })
  .expect("memory config");
  let storage = Arc::new(MemoryStorage::new());
  let hasher = Arc::new(Argon2Hasher::new(8, 1, 1).expect("light argon2 params"));
  (AppState::new(storage.clone(), hasher, config), storage)
}

pub struct Reply {
  pub status: StatusCode,
  /// The session cookie set by this response, if any.
  pub cookie: Option<Cookie<'static>>,
  pub body: Value,
}

pub async fn send<S, R, B>(app: &S, req: R) -> Reply
where
  S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
  B: MessageBody,
{
  let resp = test::call_service(app, req).await;
  let status = resp.status();
  let cookie = resp
    .response()
    .cookies()
    .find(|c| c.name() == COOKIE_NAME)
    .map(|c| c.into_owned());
  let bytes = test::read_body(resp).await;
  let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
  Reply { status, cookie, body }
}

pub fn with_session(req: TestRequest, cookie: &Cookie<'static>) -> TestRequest {
  req.cookie(cookie.clone())
}

pub fn register_request(username: &str, password: &str, is_seller: bool) -> TestRequest {
  TestRequest::post()
    .uri("/api/register")
    .set_json(json!({ "username": username, "password": password, "isSeller": is_seller }))
}

pub fn login_request(username: &str, password: &str) -> TestRequest {
  TestRequest::post()
    .uri("/api/login")
    .set_json(json!({ "username": username, "password": password }))
}

pub fn product_body(title: &str, price: i64) -> Value {
  json!({
    "title": title,
    "description": format!("{} description", title),
    "price": price,
    "imageUrl": "https://img.example/item.jpg",
  })
}
