//! Core types and trait definitions for quotebot.
//!
//! This crate is deliberately free of HTTP and database dependencies. It
//! defines the guild/user/quote model, the [`store::QuoteStore`] contract that
//! storage backends implement, and the random sampling engine used to pick
//! quotes.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod guild;
pub mod quote;
pub mod sample;
pub mod store;
pub mod user;

pub use error::{Error, Result};
