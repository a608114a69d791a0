//! Core types and trait definitions for the Orbis country ledger.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The store, upstream, summary and API crates all depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod country;
pub mod error;
pub mod gdp;
pub mod refresh;
pub mod store;
pub mod upstream;

pub use error::{RefreshError, Upstream};
