// bazaar/server/src/web/routes.rs

use crate::errors::AppError;
use crate::web::handlers::{auth_handlers, cart_handlers, checkout_handlers, product_handlers};
use actix_web::web;

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Malformed or mistyped JSON bodies become 400 with a message.
fn json_config() -> web::JsonConfig {
  web::JsonConfig::default().error_handler(|err, _req| AppError::Validation(err.to_string()).into())
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api")
      .app_data(json_config())
      .route("/health", web::get().to(health_check_handler))
      .route("/register", web::post().to(auth_handlers::register_handler))
      .route("/login", web::post().to(auth_handlers::login_handler))
      .route("/logout", web::post().to(auth_handlers::logout_handler))
      .route("/user", web::get().to(auth_handlers::current_user_handler))
      .service(
        web::resource("/products")
          .route(web::get().to(product_handlers::list_products_handler))
          .route(web::post().to(product_handlers::create_product_handler)),
      )
      .service(
        web::resource("/cart")
          .route(web::get().to(cart_handlers::get_cart_handler))
          .route(web::post().to(cart_handlers::add_to_cart_handler)),
      )
      .route("/cart/{id}", web::delete().to(cart_handlers::remove_from_cart_handler))
      .route("/checkout", web::post().to(checkout_handlers::checkout_handler)),
  );
}
