//! One-shot import of the legacy JSON quote set.
//!
//! The runner moves through `NotStarted → InProgress → Done`. It is triggered
//! by a "community observed" event whose guild name matches the manifest's
//! `guild-name`. After a full pass the manifest is rewritten with
//! `done: true`, which is the only durable migration state. A crash before
//! that write means the next run reprocesses every legacy quote; duplicate
//! detection turns the already-imported ones into rejections.
//!
//! The manifest is read once, on the first "community observed" event, and
//! cached. Without a manifest file there is nothing to migrate and the runner
//! stays idle. Any failure during a run (unreadable quotes file, missing bot
//! user, store error) aborts the attempt and returns the runner to
//! `NotStarted`. It never fails the event that triggered it.

use std::{
  collections::{HashMap, hash_map::Entry},
  io::ErrorKind,
  path::Path,
};

use quotebot_core::{
  guild::Guild,
  quote::{AddOutcome, Rejection},
  store::QuoteStore,
  user::User,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, info, instrument};

use crate::{Error, MigrationError, QuoteService, config::MigrationConfig};

// ─── File formats ────────────────────────────────────────────────────────────

/// The name-remapping manifest (`migrate-data.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Manifest {
  #[serde(default)]
  pub done:          bool,
  /// Display name of the user credited as submitter of every legacy quote.
  pub bot_user_name: String,
  /// Name of the guild the legacy quotes belong to.
  pub guild_name:    String,
  #[serde(default)]
  pub user_map:      Vec<NameMap>,
  /// Keys this runner does not use, kept so the rewrite preserves them.
  #[serde(flatten)]
  pub extra:         serde_json::Map<String, serde_json::Value>,
}

/// One canonical user and every legacy alias that maps to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NameMap {
  pub user_name: String,
  #[serde(default)]
  pub old_names: Vec<String>,
}

impl Manifest {
  /// Flatten the user map into `legacy name → canonical name`.
  pub fn aliases(&self) -> HashMap<String, String> {
    self
      .user_map
      .iter()
      .flat_map(|entry| {
        entry
          .old_names
          .iter()
          .map(move |old| (old.clone(), entry.user_name.clone()))
      })
      .collect()
  }
}

/// A single entry of the legacy quote list (`quotes.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyQuote {
  #[serde(rename = "Speaker")]
  pub speaker: String,
  #[serde(rename = "Text")]
  pub text:    String,
}

// ─── State ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum MigrationState {
  NotStarted,
  InProgress,
  Done,
}

/// Counts from one completed migration pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
  pub imported:      usize,
  /// Already present for the same speaker; nothing inserted.
  pub duplicates:    usize,
  /// Legacy speaker name absent from the user map.
  pub unmapped:      usize,
  /// Mapped to a canonical name that has no user in the guild.
  pub unknown_users: usize,
  pub empty:         usize,
}

// ─── Runner ──────────────────────────────────────────────────────────────────

pub struct MigrationRunner {
  config:   MigrationConfig,
  state:    MigrationState,
  manifest: ManifestSlot,
}

/// The manifest is read at most once per process.
enum ManifestSlot {
  Unread,
  Loaded(Manifest),
  /// Missing or unreadable; migration stays idle until restart.
  Unavailable,
}

impl MigrationRunner {
  /// Create a runner in the `NotStarted` state. No files are touched until
  /// the first [`attempt`](Self::attempt).
  pub fn new(config: MigrationConfig) -> Self {
    Self { config, state: MigrationState::NotStarted, manifest: ManifestSlot::Unread }
  }

  pub fn state(&self) -> MigrationState { self.state }

  /// Run the migration for `guild` if it is the configured target and the
  /// migration has not happened yet.
  ///
  /// Returns `Ok(None)` when nothing was due, `Ok(Some(report))` after a
  /// completed pass. A manifest that does not exist means there is nothing
  /// to migrate. A manifest that cannot be read or parsed is reported once;
  /// later attempts return `Ok(None)` without touching the disk.
  #[instrument(skip_all, fields(guild = %guild.name, state = %self.state))]
  pub async fn attempt<S: QuoteStore>(
    &mut self,
    service: &QuoteService<S>,
    guild: &Guild,
  ) -> Result<Option<MigrationReport>, MigrationError> {
    if self.state != MigrationState::NotStarted {
      return Ok(None);
    }

    let Some(manifest) = self.load_manifest().await? else {
      return Ok(None);
    };
    if manifest.done {
      info!("legacy quotes were already migrated");
      self.state = MigrationState::Done;
      return Ok(None);
    }
    if manifest.guild_name != guild.name {
      debug!(target_guild = %manifest.guild_name, "not the migration target");
      return Ok(None);
    }

    self.state = MigrationState::InProgress;
    info!("migrating legacy quotes");

    match self.run(service, guild, manifest).await {
      Ok(report) => {
        self.state = MigrationState::Done;
        info!(
          imported = report.imported,
          duplicates = report.duplicates,
          unmapped = report.unmapped,
          unknown_users = report.unknown_users,
          empty = report.empty,
          "legacy migration complete"
        );
        Ok(Some(report))
      }
      Err(e) => {
        self.state = MigrationState::NotStarted;
        Err(e)
      }
    }
  }

  async fn load_manifest(&mut self) -> Result<Option<Manifest>, MigrationError> {
    match &self.manifest {
      ManifestSlot::Loaded(manifest) => return Ok(Some(manifest.clone())),
      ManifestSlot::Unavailable => return Ok(None),
      ManifestSlot::Unread => {}
    }

    match read_json::<Manifest>(&self.config.manifest_path).await {
      Ok(manifest) => {
        self.manifest = ManifestSlot::Loaded(manifest.clone());
        Ok(Some(manifest))
      }
      Err(MigrationError::Read { path, source }) if source.kind() == ErrorKind::NotFound => {
        info!(path = %path.display(), "no legacy manifest, nothing to migrate");
        self.manifest = ManifestSlot::Unavailable;
        Ok(None)
      }
      Err(e) => {
        self.manifest = ManifestSlot::Unavailable;
        Err(e)
      }
    }
  }

  async fn run<S: QuoteStore>(
    &self,
    service: &QuoteService<S>,
    guild: &Guild,
    mut manifest: Manifest,
  ) -> Result<MigrationReport, MigrationError> {
    let legacy: Vec<LegacyQuote> = read_json(&self.config.quotes_path).await?;
    let aliases = manifest.aliases();
    let store = service.store();

    let submitter = store
      .find_user_by_name(&manifest.bot_user_name, guild.guild_id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| MigrationError::MissingBotUser(manifest.bot_user_name.clone()))?;

    let mut speakers: HashMap<String, Option<User>> = HashMap::new();
    let mut report = MigrationReport::default();

    for entry in &legacy {
      let Some(canonical) = aliases.get(&entry.speaker) else {
        report.unmapped += 1;
        continue;
      };
      if entry.text.trim().is_empty() {
        report.empty += 1;
        continue;
      }

      let speaker = match speakers.entry(canonical.clone()) {
        Entry::Occupied(slot) => slot.into_mut(),
        Entry::Vacant(slot) => {
          let user = store
            .find_user_by_name(canonical, guild.guild_id)
            .await
            .map_err(Error::store)?;
          slot.insert(user)
        }
      };
      let Some(speaker) = speaker.as_ref() else {
        report.unknown_users += 1;
        continue;
      };

      match service
        .add_resolved_quote(&entry.text, speaker, &submitter, guild)
        .await?
      {
        AddOutcome::Added { .. } => report.imported += 1,
        AddOutcome::Rejected { reason: Rejection::DuplicateContent } => report.duplicates += 1,
        AddOutcome::Rejected { reason: Rejection::EmptyContent } => report.empty += 1,
      }
    }

    manifest.done = true;
    write_json(&self.config.manifest_path, &manifest).await?;

    Ok(report)
  }
}

// ─── File helpers ────────────────────────────────────────────────────────────

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, MigrationError> {
  let raw = tokio::fs::read(path)
    .await
    .map_err(|source| MigrationError::Read { path: path.to_path_buf(), source })?;
  serde_json::from_slice(&raw)
    .map_err(|source| MigrationError::Parse { path: path.to_path_buf(), source })
}

/// Overwrite `path` with pretty-printed JSON.
async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), MigrationError> {
  let raw = serde_json::to_vec_pretty(value).map_err(MigrationError::Serialize)?;
  tokio::fs::write(path, raw)
    .await
    .map_err(|source| MigrationError::Write { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn manifest_uses_kebab_case_keys() {
    let manifest: Manifest = serde_json::from_str(
      r#"{
        "bot-user-name": "QuoteBot",
        "guild-name": "Alpha",
        "user-map": [
          { "user-name": "Bea", "old-names": ["bea_old", "B"] },
          { "user-name": "Cid", "old-names": ["cid"] }
        ]
      }"#,
    )
    .unwrap();

    assert!(!manifest.done);
    assert_eq!(manifest.bot_user_name, "QuoteBot");

    let aliases = manifest.aliases();
    assert_eq!(aliases.len(), 3);
    assert_eq!(aliases["bea_old"], "Bea");
    assert_eq!(aliases["B"], "Bea");
    assert_eq!(aliases["cid"], "Cid");

    let rewritten = serde_json::to_value(&manifest).unwrap();
    assert_eq!(rewritten["done"], false);
    assert!(rewritten.get("user-map").is_some());
  }

  #[test]
  fn legacy_quotes_use_capitalised_keys() {
    let quotes: Vec<LegacyQuote> =
      serde_json::from_str(r#"[{"Speaker": "bea_old", "Text": "hi"}]"#).unwrap();
    assert_eq!(quotes[0].speaker, "bea_old");
    assert_eq!(quotes[0].text, "hi");
  }

  #[test]
  fn state_display() {
    assert_eq!(MigrationState::NotStarted.to_string(), "not_started");
    assert_eq!(MigrationState::Done.to_string(), "done");
  }
}
