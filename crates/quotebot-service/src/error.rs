//! Error types for `quotebot-service`.

use std::path::PathBuf;

use thiserror::Error;

/// A failed service operation. Rejected quotes are not errors; see
/// [`AddOutcome`](quotebot_core::quote::AddOutcome).
#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] quotebot_core::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }

  /// Whether the error means the referenced guild is unknown, as opposed to
  /// a backend failure.
  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::Core(quotebot_core::Error::GuildNotFound(_)))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Why a legacy migration attempt was abandoned.
#[derive(Debug, Error)]
pub enum MigrationError {
  #[error("failed to read {path}: {source}")]
  Read {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to write {path}: {source}")]
  Write {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse {path}: {source}")]
  Parse {
    path:   PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("failed to serialise migration manifest: {0}")]
  Serialize(#[source] serde_json::Error),

  #[error("bot user {0:?} does not exist in the target guild")]
  MissingBotUser(String),

  #[error(transparent)]
  Service(#[from] Error),
}
