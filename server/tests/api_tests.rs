// tests/api_tests.rs
mod common;

use actix_web::cookie::{time, SameSite};
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{web, App};
use bazaar::models::{OrderStatus, Session};
use bazaar::storage::Storage;
use bazaar::web::configure_app_routes;
use chrono::{Duration, Utc};
use common::*;
use serde_json::json;

macro_rules! init_app {
  ($state:expr) => {
    test::init_service(App::new().app_data(web::Data::new($state)).configure(configure_app_routes)).await
  };
}

#[actix_web::test]
async fn health_reports_ok() {
  let (state, _) = test_state();
  let app = init_app!(state);
  let reply = send(&app, TestRequest::get().uri("/api/health").to_request()).await;
  assert_eq!(reply.status, StatusCode::OK);
  assert_eq!(reply.body, json!({ "status": "ok" }));
}

#[actix_web::test]
async fn register_returns_user_and_session_cookie() {
  let (state, _) = test_state();
  let app = init_app!(state);

  let reply = send(&app, register_request("alice", "s3cret", false).to_request()).await;
  assert_eq!(reply.status, StatusCode::CREATED);
  assert_eq!(reply.body["username"], "alice");
  assert_eq!(reply.body["isSeller"], false);
  assert!(reply.body.get("password").is_none());
  assert!(reply.body.get("passwordHash").is_none());

  let cookie = reply.cookie.expect("session cookie");
  assert_eq!(cookie.http_only(), Some(true));
  assert_eq!(cookie.path(), Some("/"));
  assert_eq!(cookie.same_site(), Some(SameSite::Lax));
  assert_eq!(cookie.max_age(), Some(time::Duration::days(30)));
  assert!(!cookie.secure().unwrap_or(false));

  let me = send(&app, with_session(TestRequest::get().uri("/api/user"), &cookie).to_request()).await;
  assert_eq!(me.status, StatusCode::OK);
  assert_eq!(me.body["id"], reply.body["id"]);
}

#[actix_web::test]
async fn duplicate_username_is_rejected_and_not_stored_twice() {
  let (state, storage) = test_state();
  let app = init_app!(state);

  let first = send(&app, register_request("bob", "pw1", false).to_request()).await;
  assert_eq!(first.status, StatusCode::CREATED);
  let second = send(&app, register_request("bob", "pw2", true).to_request()).await;
  assert_eq!(second.status, StatusCode::BAD_REQUEST);
  assert_eq!(second.body["message"], "Username already exists");
  assert!(second.cookie.is_none());
  assert_eq!(storage.user_count(), 1);
}

#[actix_web::test]
async fn register_rejects_missing_or_empty_fields() {
  let (state, storage) = test_state();
  let app = init_app!(state);

  let empty = send(&app, register_request("carol", "", false).to_request()).await;
  assert_eq!(empty.status, StatusCode::BAD_REQUEST);

  let missing = TestRequest::post()
    .uri("/api/register")
    .set_json(json!({ "username": "carol" }))
    .to_request();
  let missing = send(&app, missing).await;
  assert_eq!(missing.status, StatusCode::BAD_REQUEST);
  assert!(missing.body["message"].is_string());
  assert_eq!(storage.user_count(), 0);
}

#[actix_web::test]
async fn wrong_password_fails_even_after_successful_login() {
  let (state, _) = test_state();
  let app = init_app!(state);
  send(&app, register_request("dave", "right", false).to_request()).await;

  let ok = send(&app, login_request("dave", "right").to_request()).await;
  assert_eq!(ok.status, StatusCode::OK);
  assert_eq!(ok.body["username"], "dave");
  assert!(ok.cookie.is_some());

  for _ in 0..2 {
    let bad = send(&app, login_request("dave", "wrong").to_request()).await;
    assert_eq!(bad.status, StatusCode::UNAUTHORIZED);
    assert!(bad.cookie.is_none());
  }

  let unknown = send(&app, login_request("nobody", "right").to_request()).await;
  assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);

  let blank = send(&app, login_request("dave", "").to_request()).await;
  assert_eq!(blank.status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn logout_is_idempotent_and_ends_the_session() {
  let (state, storage) = test_state();
  let app = init_app!(state);
  let cookie = send(&app, register_request("erin", "pw", false).to_request())
    .await
    .cookie
    .expect("session cookie");
  assert_eq!(storage.session_count(), 1);

  for _ in 0..2 {
    let out = send(&app, with_session(TestRequest::post().uri("/api/logout"), &cookie).to_request()).await;
    assert_eq!(out.status, StatusCode::OK);
    let cleared = out.cookie.expect("removal cookie");
    assert_eq!(cleared.value(), "");
  }
  assert_eq!(storage.session_count(), 0);

  let anonymous = send(&app, TestRequest::post().uri("/api/logout").to_request()).await;
  assert_eq!(anonymous.status, StatusCode::OK);

  let me = send(&app, with_session(TestRequest::get().uri("/api/user"), &cookie).to_request()).await;
  assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn expired_session_counts_as_no_session() {
  let (state, storage) = test_state();
  let app = init_app!(state);
  let user = send(&app, register_request("frank", "pw", false).to_request()).await.body;
  let user_id = user["id"].as_i64().expect("user id") as i32;

  let now = Utc::now();
  storage
    .create_session(Session {
      token: "stale-token".to_string(),
      user_id,
      created_at: now - Duration::days(31),
      expires_at: now - Duration::days(1),
    })
    .await
    .unwrap();

  let stale = actix_web::cookie::Cookie::new(COOKIE_NAME, "stale-token");
  let me = send(&app, with_session(TestRequest::get().uri("/api/user"), &stale).to_request()).await;
  assert_eq!(me.status, StatusCode::UNAUTHORIZED);
  let cart = send(&app, with_session(TestRequest::get().uri("/api/cart"), &stale).to_request()).await;
  assert_eq!(cart.status, StatusCode::UNAUTHORIZED);

  let unknown = actix_web::cookie::Cookie::new(COOKIE_NAME, "never-issued");
  let me = send(&app, with_session(TestRequest::get().uri("/api/user"), &unknown).to_request()).await;
  assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn non_sellers_always_get_forbidden_on_create_product() {
  let (state, storage) = test_state();
  let app = init_app!(state);
  let buyer = send(&app, register_request("gina", "pw", false).to_request())
    .await
    .cookie
    .expect("session cookie");

  let well_formed = with_session(TestRequest::post().uri("/api/products"), &buyer)
    .set_json(product_body("Lamp", 1000))
    .to_request();
  assert_eq!(send(&app, well_formed).await.status, StatusCode::FORBIDDEN);

  let malformed = with_session(TestRequest::post().uri("/api/products"), &buyer)
    .insert_header(("content-type", "application/json"))
    .set_payload("{not json")
    .to_request();
  assert_eq!(send(&app, malformed).await.status, StatusCode::FORBIDDEN);

  let anonymous = TestRequest::post()
    .uri("/api/products")
    .set_json(product_body("Lamp", 1000))
    .to_request();
  assert_eq!(send(&app, anonymous).await.status, StatusCode::FORBIDDEN);

  assert!(storage.list_products().await.unwrap().is_empty());
}

#[actix_web::test]
async fn seller_creates_products_owned_by_them() {
  let (state, _) = test_state();
  let app = init_app!(state);
  let registered = send(&app, register_request("hank", "pw", true).to_request()).await;
  let seller = registered.cookie.expect("session cookie");
  let seller_id = registered.body["id"].clone();

  let mut body = product_body("Desk", 25000);
  body["sellerId"] = json!(9999);
  let created = send(
    &app,
    with_session(TestRequest::post().uri("/api/products"), &seller)
      .set_json(body)
      .to_request(),
  )
  .await;
  assert_eq!(created.status, StatusCode::CREATED);
  assert_eq!(created.body["sellerId"], seller_id);
  assert_eq!(created.body["price"], 25000);
  assert_eq!(created.body["imageUrl"], "https://img.example/item.jpg");

  let negative = send(
    &app,
    with_session(TestRequest::post().uri("/api/products"), &seller)
      .set_json(product_body("Chair", -5))
      .to_request(),
  )
  .await;
  assert_eq!(negative.status, StatusCode::BAD_REQUEST);
  assert!(negative.body["message"].is_string());

  send(
    &app,
    with_session(TestRequest::post().uri("/api/products"), &seller)
      .set_json(product_body("Shelf", 0))
      .to_request(),
  )
  .await;

  let listed = send(&app, TestRequest::get().uri("/api/products").to_request()).await;
  assert_eq!(listed.status, StatusCode::OK);
  let titles: Vec<_> = listed
    .body
    .as_array()
    .expect("product array")
    .iter()
    .map(|p| p["title"].as_str().unwrap_or_default().to_string())
    .collect();
  assert_eq!(titles, vec!["Desk", "Shelf"]);
}

#[actix_web::test]
async fn cart_and_checkout_require_a_session() {
  let (state, _) = test_state();
  let app = init_app!(state);

  let get = send(&app, TestRequest::get().uri("/api/cart").to_request()).await;
  assert_eq!(get.status, StatusCode::UNAUTHORIZED);

  let add_malformed = TestRequest::post()
    .uri("/api/cart")
    .insert_header(("content-type", "application/json"))
    .set_payload("garbage")
    .to_request();
  assert_eq!(send(&app, add_malformed).await.status, StatusCode::UNAUTHORIZED);

  let remove = send(&app, TestRequest::delete().uri("/api/cart/abc").to_request()).await;
  assert_eq!(remove.status, StatusCode::UNAUTHORIZED);

  let checkout = send(&app, TestRequest::post().uri("/api/checkout").to_request()).await;
  assert_eq!(checkout.status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn cart_input_is_validated() {
  let (state, _) = test_state();
  let app = init_app!(state);
  let buyer = send(&app, register_request("ivy", "pw", false).to_request())
    .await
    .cookie
    .expect("session cookie");

  let defaulted = send(
    &app,
    with_session(TestRequest::post().uri("/api/cart"), &buyer)
      .set_json(json!({ "productId": 1 }))
      .to_request(),
  )
  .await;
  assert_eq!(defaulted.status, StatusCode::OK);
  assert_eq!(defaulted.body["quantity"], 1);

  let zero = send(
    &app,
    with_session(TestRequest::post().uri("/api/cart"), &buyer)
      .set_json(json!({ "productId": 1, "quantity": 0 }))
      .to_request(),
  )
  .await;
  assert_eq!(zero.status, StatusCode::BAD_REQUEST);

  let malformed = send(
    &app,
    with_session(TestRequest::post().uri("/api/cart"), &buyer)
      .set_json(json!({ "quantity": 2 }))
      .to_request(),
  )
  .await;
  assert_eq!(malformed.status, StatusCode::BAD_REQUEST);

  let bad_id = send(
    &app,
    with_session(TestRequest::delete().uri("/api/cart/abc"), &buyer).to_request(),
  )
  .await;
  assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);

  let absent = send(
    &app,
    with_session(TestRequest::delete().uri("/api/cart/4242"), &buyer).to_request(),
  )
  .await;
  assert_eq!(absent.status, StatusCode::OK);
}

#[actix_web::test]
async fn same_product_twice_makes_two_removable_rows() {
  let (state, _) = test_state();
  let app = init_app!(state);
  let seller = send(&app, register_request("jack", "pw", true).to_request())
    .await
    .cookie
    .expect("session cookie");
  let product = send(
    &app,
    with_session(TestRequest::post().uri("/api/products"), &seller)
      .set_json(product_body("Mug", 900))
      .to_request(),
  )
  .await
  .body;

  let mut item_ids = Vec::new();
  for _ in 0..2 {
    let added = send(
      &app,
      with_session(TestRequest::post().uri("/api/cart"), &seller)
        .set_json(json!({ "productId": product["id"] }))
        .to_request(),
    )
    .await;
    item_ids.push(added.body["id"].as_i64().expect("cart item id"));
  }
  assert_ne!(item_ids[0], item_ids[1]);

  let cart = send(&app, with_session(TestRequest::get().uri("/api/cart"), &seller).to_request()).await;
  assert_eq!(cart.body.as_array().map(Vec::len), Some(2));
  assert_eq!(cart.body[0]["product"]["title"], "Mug");

  let uri = format!("/api/cart/{}", item_ids[0]);
  let removed = send(&app, with_session(TestRequest::delete().uri(&uri), &seller).to_request()).await;
  assert_eq!(removed.status, StatusCode::OK);

  let cart = send(&app, with_session(TestRequest::get().uri("/api/cart"), &seller).to_request()).await;
  let remaining = cart.body.as_array().expect("cart array");
  assert_eq!(remaining.len(), 1);
  assert_eq!(remaining[0]["id"].as_i64(), Some(item_ids[1]));
}

#[actix_web::test]
async fn checkout_on_empty_cart_creates_no_order() {
  let (state, storage) = test_state();
  let app = init_app!(state);
  let registered = send(&app, register_request("kate", "pw", false).to_request()).await;
  let buyer = registered.cookie.expect("session cookie");
  let user_id = registered.body["id"].as_i64().expect("user id") as i32;

  let reply = send(&app, with_session(TestRequest::post().uri("/api/checkout"), &buyer).to_request()).await;
  assert_eq!(reply.status, StatusCode::BAD_REQUEST);
  assert_eq!(reply.body["message"], "Cart empty");
  assert!(storage.orders_for(user_id).is_empty());
}

#[actix_web::test]
async fn checkout_totals_cart_and_empties_it() {
  let (state, storage) = test_state();
  let app = init_app!(state);
  let seller = send(&app, register_request("liam", "pw", true).to_request())
    .await
    .cookie
    .expect("session cookie");

  let mut product_ids = Vec::new();
  for (title, price) in [("Wireless Mouse", 5000), ("Gaming Headset", 8000)] {
    let created = send(
      &app,
      with_session(TestRequest::post().uri("/api/products"), &seller)
        .set_json(product_body(title, price))
        .to_request(),
    )
    .await;
    product_ids.push(created.body["id"].clone());
  }

  let registered = send(&app, register_request("mia", "pw", false).to_request()).await;
  let buyer = registered.cookie.expect("session cookie");
  let buyer_id = registered.body["id"].as_i64().expect("user id") as i32;

  for (product_id, quantity) in [(&product_ids[0], 2), (&product_ids[1], 1)] {
    let added = send(
      &app,
      with_session(TestRequest::post().uri("/api/cart"), &buyer)
        .set_json(json!({ "productId": product_id, "quantity": quantity }))
        .to_request(),
    )
    .await;
    assert_eq!(added.status, StatusCode::OK);
  }

  let order = send(&app, with_session(TestRequest::post().uri("/api/checkout"), &buyer).to_request()).await;
  assert_eq!(order.status, StatusCode::OK);
  assert_eq!(order.body["total"], 18000);
  assert_eq!(order.body["status"], "completed");
  assert_eq!(order.body["userId"], buyer_id);

  let cart = send(&app, with_session(TestRequest::get().uri("/api/cart"), &buyer).to_request()).await;
  assert_eq!(cart.status, StatusCode::OK);
  assert_eq!(cart.body, json!([]));

  let orders = storage.orders_for(buyer_id);
  assert_eq!(orders.len(), 1);
  assert_eq!(orders[0].total, 18000);
  assert_eq!(orders[0].status, OrderStatus::Completed);

  let again = send(&app, with_session(TestRequest::post().uri("/api/checkout"), &buyer).to_request()).await;
  assert_eq!(again.status, StatusCode::BAD_REQUEST);
  assert_eq!(storage.orders_for(buyer_id).len(), 1);
}
