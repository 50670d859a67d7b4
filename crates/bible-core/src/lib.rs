//! Core types and trait definitions for the Bible text store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The store backend, the JSON API and the ETL loaders all depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod catalog;
pub mod document;
pub mod error;
pub mod model;
pub mod store;
pub mod validate;

pub use error::{Error, Result};
