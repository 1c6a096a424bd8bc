//! Core types and trait definitions for the Marks link store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod clock;
pub mod error;
pub mod identity;
pub mod item;
pub mod lifecycle;
pub mod owned;
pub mod profile;
pub mod store;
pub mod view;

pub use error::{Error, Result};
