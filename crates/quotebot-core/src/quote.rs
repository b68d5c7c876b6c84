//! Quote types — attributed text snippets and the outcome of adding one.
//!
//! A quote is unique per `(content, speaker)`. Attempts to add an empty or
//! duplicate quote are not errors; they produce [`AddOutcome::Rejected`] with
//! a [`Rejection`] the presentation layer can show to the submitter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::User;

// ─── Stored quote ────────────────────────────────────────────────────────────

/// A persisted quote with its speaker and submitter resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
  pub quote_id:   Uuid,
  pub content:    String,
  pub speaker:    User,
  pub submitter:  User,
  pub guild_id:   Uuid,
  pub created_at: DateTime<Utc>,
}

/// Input for [`QuoteStore::insert_quote`](crate::store::QuoteStore::insert_quote).
/// All references must already be resolved to stored records.
#[derive(Debug, Clone)]
pub struct NewQuote {
  pub content:   String,
  pub speaker:   User,
  pub submitter: User,
  pub guild_id:  Uuid,
}

/// Parameters for [`QuoteStore::find_quotes`](crate::store::QuoteStore::find_quotes).
#[derive(Debug, Clone, Copy)]
pub struct QuoteFilter {
  pub guild_id:   Uuid,
  /// Restrict to quotes spoken by this user.
  pub speaker_id: Option<Uuid>,
}

impl QuoteFilter {
  pub fn guild(guild_id: Uuid) -> Self { Self { guild_id, speaker_id: None } }

  pub fn speaker(guild_id: Uuid, speaker_id: Uuid) -> Self {
    Self { guild_id, speaker_id: Some(speaker_id) }
  }
}

// ─── Add outcome ─────────────────────────────────────────────────────────────

/// Why a quote submission was turned down.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::IntoStaticStr,
)]
pub enum Rejection {
  /// The content was empty after trimming, or the message had only embeds.
  #[serde(rename = "empty content")]
  #[strum(serialize = "empty content")]
  EmptyContent,
  /// The speaker already has a quote with identical content.
  #[serde(rename = "duplicate content")]
  #[strum(serialize = "duplicate content")]
  DuplicateContent,
}

impl Rejection {
  /// A sentence suitable for replying to the submitter.
  pub fn message(self) -> &'static str {
    match self {
      Self::EmptyContent => {
        "Sorry, but I can't accept empty quotes or quotes with only embedded content"
      }
      Self::DuplicateContent => {
        "Sorry, but a quote with that content already exists for this user"
      }
    }
  }
}

/// The result of an add-quote request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AddOutcome {
  Added { quote: Quote },
  Rejected { reason: Rejection },
}

impl AddOutcome {
  pub fn is_added(&self) -> bool { matches!(self, Self::Added { .. }) }

  pub fn quote(&self) -> Option<&Quote> {
    match self {
      Self::Added { quote } => Some(quote),
      Self::Rejected { .. } => None,
    }
  }

  pub fn rejection(&self) -> Option<Rejection> {
    match self {
      Self::Added { .. } => None,
      Self::Rejected { reason } => Some(*reason),
    }
  }
}

impl From<Rejection> for AddOutcome {
  fn from(reason: Rejection) -> Self { Self::Rejected { reason } }
}
