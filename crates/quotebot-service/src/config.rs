//! Service configuration, deserialised from the `[service]` table of the
//! server's config file.

use std::path::PathBuf;

use quotebot_core::sample::DEFAULT_MAX_AMOUNT;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
  /// Ceiling for the number of quotes a single query may return.
  #[serde(default = "default_max_amount")]
  pub max_amount: usize,
  /// Legacy import settings. Migration is disabled when absent.
  #[serde(default)]
  pub migration:  Option<MigrationConfig>,
}

impl Default for ServiceConfig {
  fn default() -> Self {
    Self { max_amount: DEFAULT_MAX_AMOUNT, migration: None }
  }
}

fn default_max_amount() -> usize { DEFAULT_MAX_AMOUNT }

/// Locations of the two legacy JSON documents.
#[derive(Debug, Clone, Deserialize)]
pub struct MigrationConfig {
  /// Name-remapping manifest; rewritten with `done: true` after a run.
  #[serde(default = "default_manifest_path")]
  pub manifest_path: PathBuf,
  /// Flat list of legacy `{Speaker, Text}` pairs; never modified.
  #[serde(default = "default_quotes_path")]
  pub quotes_path:   PathBuf,
}

impl Default for MigrationConfig {
  fn default() -> Self {
    Self {
      manifest_path: default_manifest_path(),
      quotes_path:   default_quotes_path(),
    }
  }
}

fn default_manifest_path() -> PathBuf { PathBuf::from("legacy-data/migrate-data.json") }

fn default_quotes_path() -> PathBuf { PathBuf::from("legacy-data/quotes.json") }
