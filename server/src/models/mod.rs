// bazaar/server/src/models/mod.rs

//! Records stored by the persistence gateway, plus the request inputs that create them.

pub mod cart_item;
pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use cart_item::{AddToCartInput, CartItem, CartLine, NewCartItem};
pub use order::{NewOrder, Order, OrderStatus};
pub use product::{NewProduct, Product, ProductInput};
pub use session::Session;
pub use user::{NewUser, User};
