//! Core types, validation and service logic for the CRM API.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! storage backend implements the repository traits in [`store`]; the HTTP
//! layer calls into [`services`] and [`filter`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod filter;
pub mod models;
pub mod services;
pub mod store;
pub mod validate;

pub use error::{Error, Result};

#[cfg(test)]
mod tests;
