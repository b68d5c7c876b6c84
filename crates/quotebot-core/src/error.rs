//! Error types for `quotebot-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A guild was referenced before its "community observed" event arrived.
  #[error("guild not found: {0}")]
  GuildNotFound(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
