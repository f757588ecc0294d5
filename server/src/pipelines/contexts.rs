// bazaar/server/src/pipelines/contexts.rs

//! Data carried through each pipeline. Handlers receive these wrapped in `ContextData`.

use crate::models::{AddToCartInput, CartItem, CartLine, Order, Product, ProductInput, Session, User};
use crate::state::AppState;
use actix_web::web::Bytes;

/// Access to shared services from any pipeline context.
pub trait HasAppState {
  fn app_state(&self) -> &AppState;
}

/// Contexts whose request may carry an authenticated caller.
pub trait CallerScoped: HasAppState {
  fn caller(&self) -> Option<&User>;
}

/// Contexts that end by issuing a login session.
pub trait SessionIssuing: HasAppState {
  fn session_user_id(&self) -> Option<i32>;
  fn set_session(&mut self, session: Session);
}

pub struct RegisterCtxData {
  pub app_state: AppState,
  pub username: String,
  pub password: String,
  pub is_seller: bool,
  pub password_hash: Option<String>,
  pub user: Option<User>,
  pub session: Option<Session>,
}

impl RegisterCtxData {
  pub fn new(app_state: AppState, username: String, password: String, is_seller: bool) -> Self {
    Self {
      app_state,
      username,
      password,
      is_seller,
      password_hash: None,
      user: None,
      session: None,
    }
  }
}

pub struct LoginCtxData {
  pub app_state: AppState,
  pub username: String,
  pub password: String,
  pub user: Option<User>,
  pub session: Option<Session>,
}

impl LoginCtxData {
  pub fn new(app_state: AppState, username: String, password: String) -> Self {
    Self {
      app_state,
      username,
      password,
      user: None,
      session: None,
    }
  }
}

/// The body stays raw until the caller has been authorized.
pub struct CreateProductCtxData {
  pub app_state: AppState,
  pub caller: Option<User>,
  pub raw_body: Bytes,
  pub input: Option<ProductInput>,
  pub product: Option<Product>,
}

impl CreateProductCtxData {
  pub fn new(app_state: AppState, caller: Option<User>, raw_body: Bytes) -> Self {
    Self {
      app_state,
      caller,
      raw_body,
      input: None,
      product: None,
    }
  }
}

pub struct AddToCartCtxData {
  pub app_state: AppState,
  pub caller: Option<User>,
  pub raw_body: Bytes,
  pub input: Option<AddToCartInput>,
  pub item: Option<CartItem>,
}

impl AddToCartCtxData {
  pub fn new(app_state: AppState, caller: Option<User>, raw_body: Bytes) -> Self {
    Self {
      app_state,
      caller,
      raw_body,
      input: None,
      item: None,
    }
  }
}

pub struct CheckoutCtxData {
  pub app_state: AppState,
  pub caller: Option<User>,
  pub cart_lines: Vec<CartLine>,
  pub total: Option<i64>,
  pub order: Option<Order>,
}

impl CheckoutCtxData {
  pub fn new(app_state: AppState, caller: Option<User>) -> Self {
    Self {
      app_state,
      caller,
      cart_lines: Vec::new(),
      total: None,
      order: None,
    }
  }
}

macro_rules! impl_has_app_state {
  ($($ctx:ty),+ $(,)?) => {
    $(impl HasAppState for $ctx {
      fn app_state(&self) -> &AppState {
        &self.app_state
      }
    })+
  };
}

impl_has_app_state!(RegisterCtxData, LoginCtxData, CreateProductCtxData, AddToCartCtxData, CheckoutCtxData);

macro_rules! impl_caller_scoped {
  ($($ctx:ty),+ $(,)?) => {
    $(impl CallerScoped for $ctx {
      fn caller(&self) -> Option<&User> {
        self.caller.as_ref()
      }
    })+
  };
}

impl_caller_scoped!(CreateProductCtxData, AddToCartCtxData, CheckoutCtxData);

macro_rules! impl_session_issuing {
  ($($ctx:ty),+ $(,)?) => {
    $(impl SessionIssuing for $ctx {
      fn session_user_id(&self) -> Option<i32> {
        self.user.as_ref().map(|u| u.id)
      }

      fn set_session(&mut self, session: Session) {
        self.session = Some(session);
      }
    })+
  };
}

impl_session_issuing!(RegisterCtxData, LoginCtxData);
