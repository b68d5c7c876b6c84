//! Quote workflows on top of any [`QuoteStore`](quotebot_core::store::QuoteStore).
//!
//! [`QuoteService`] is the single context object the rest of the system talks
//! to. It owns the store handle, the configured amount ceiling and the legacy
//! migration runner, and turns inbound platform events into store operations:
//!
//! - community and member events keep the guild/user mirror up to date,
//! - add requests go through the upsert workflow (lazy user creation plus
//!   empty/duplicate rejection),
//! - queries load candidates and hand them to the sampling engine.

pub mod config;
pub mod error;
pub mod migration;
mod service;

pub use config::{MigrationConfig, ServiceConfig};
pub use error::{Error, MigrationError, Result};
pub use service::{GuildSync, QuoteService};
