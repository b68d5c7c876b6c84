//! The `QuoteStore` trait — the entity store contract.
//!
//! The trait is implemented by storage backends (e.g. `quotebot-store-sqlite`).
//! Higher layers (`quotebot-service`, `quotebot-api`) depend on this
//! abstraction, not on any concrete backend.
//!
//! Lookups report absence as `None`; it is up to callers to decide whether a
//! missing record is an error. Uniqueness (guild platform ID, user platform ID
//! per guild, quote content per speaker) is enforced by the backend itself, so
//! concurrent writers cannot create duplicates even when an `*_exists` check
//! raced.

use std::future::Future;

use uuid::Uuid;

use crate::{
  guild::Guild,
  quote::{NewQuote, Quote, QuoteFilter},
  user::User,
};

/// Abstraction over a quotebot storage backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait QuoteStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Guilds ────────────────────────────────────────────────────────────

  fn guild_exists<'a>(
    &'a self,
    platform_id: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Retrieve a guild by its platform ID. Returns `None` if not found.
  fn find_guild<'a>(
    &'a self,
    platform_id: &'a str,
  ) -> impl Future<Output = Result<Option<Guild>, Self::Error>> + Send + 'a;

  /// Create and persist a guild. If `platform_id` is already known the
  /// existing record is returned unchanged.
  fn add_guild<'a>(
    &'a self,
    platform_id: &'a str,
    name: &'a str,
  ) -> impl Future<Output = Result<Guild, Self::Error>> + Send + 'a;

  /// Update a guild's display name. Returns `None` if the guild is unknown.
  fn rename_guild<'a>(
    &'a self,
    platform_id: &'a str,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<Guild>, Self::Error>> + Send + 'a;

  // ── Users ─────────────────────────────────────────────────────────────

  fn user_exists<'a>(
    &'a self,
    platform_id: &'a str,
    guild_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Retrieve a user by platform ID within a guild.
  fn find_user<'a>(
    &'a self,
    platform_id: &'a str,
    guild_id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Retrieve a user by display name within a guild. If several users share
  /// the name, the earliest created wins.
  fn find_user_by_name<'a>(
    &'a self,
    name: &'a str,
    guild_id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Create and persist a user in `guild_id`. If the user is already known in
  /// that guild the existing record is returned unchanged.
  fn add_user<'a>(
    &'a self,
    platform_id: &'a str,
    name: &'a str,
    guild_id: Uuid,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + 'a;

  /// Update a user's display name. Returns `None` if the user is unknown.
  fn rename_user<'a>(
    &'a self,
    platform_id: &'a str,
    guild_id: Uuid,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  // ── Quotes ────────────────────────────────────────────────────────────

  /// Whether `speaker_id` already has a quote with exactly this content.
  fn quote_exists<'a>(
    &'a self,
    content: &'a str,
    speaker_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Persist a new quote. The `created_at` timestamp is set by the store.
  ///
  /// Returns `None` if the `(content, speaker)` uniqueness constraint
  /// rejected the row.
  fn insert_quote(
    &self,
    input: NewQuote,
  ) -> impl Future<Output = Result<Option<Quote>, Self::Error>> + Send + '_;

  /// Return every quote matching `filter`, in no particular order.
  fn find_quotes(
    &self,
    filter: QuoteFilter,
  ) -> impl Future<Output = Result<Vec<Quote>, Self::Error>> + Send + '_;
}
