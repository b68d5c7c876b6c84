//! JSON event API for quotebot.
//!
//! The platform adapter (gateway client, slash-command registration, embed
//! rendering) lives outside this workspace. It forwards community, member and
//! command events here and renders the JSON it gets back. Auth, TLS, and
//! transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", quotebot_api::api_router(service.clone()))
//! ```

pub mod error;
pub mod guilds;
pub mod members;
pub mod quotes;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, put},
};
use quotebot_core::store::QuoteStore;
use quotebot_service::QuoteService;

pub use error::ApiError;

/// Build the event API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(service: Arc<QuoteService<S>>) -> Router<()>
where
  S: QuoteStore + 'static,
{
  Router::new()
    // Community observed / guild updated
    .route("/guilds/{guild}", put(guilds::observe::<S>).patch(guilds::rename::<S>))
    // Member observed / member updated
    .route(
      "/guilds/{guild}/members/{user}",
      put(members::observe::<S>).patch(members::update::<S>),
    )
    // Quote query / quote add
    .route("/guilds/{guild}/quotes", get(quotes::random::<S>).post(quotes::add::<S>))
    .with_state(service)
}

#[cfg(test)]
mod tests;
