// bazaar/server/src/lib.rs

//! Bazaar: a session-authenticated marketplace with a seller catalog, carts and checkout.

pub mod config;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod seed;
pub mod services;
pub mod state;
pub mod storage;
pub mod web;
