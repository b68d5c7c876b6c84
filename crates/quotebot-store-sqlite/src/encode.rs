//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings and UUIDs as hyphenated
//! lowercase strings.

use chrono::{DateTime, Utc};
use quotebot_core::{guild::Guild, quote::Quote, user::User};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawGuild::from_row`].
pub const GUILD_COLUMNS: &str = "guild_id, platform_id, name, created_at";

/// Raw strings read directly from a `guilds` row.
pub struct RawGuild {
  pub guild_id:    String,
  pub platform_id: String,
  pub name:        String,
  pub created_at:  String,
}

impl RawGuild {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      guild_id:    row.get(0)?,
      platform_id: row.get(1)?,
      name:        row.get(2)?,
      created_at:  row.get(3)?,
    })
  }

  pub fn into_guild(self) -> Result<Guild> {
    Ok(Guild {
      guild_id:    decode_uuid(&self.guild_id)?,
      platform_id: self.platform_id,
      name:        self.name,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Column list matching [`RawUser::from_row`].
pub const USER_COLUMNS: &str = "user_id, platform_id, name, guild_id, created_at";

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:     String,
  pub platform_id: String,
  pub name:        String,
  pub guild_id:    String,
  pub created_at:  String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Self::from_row_at(row, 0)
  }

  /// Read the five user columns starting at column `offset`.
  pub fn from_row_at(row: &rusqlite::Row<'_>, offset: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:     row.get(offset)?,
      platform_id: row.get(offset + 1)?,
      name:        row.get(offset + 2)?,
      guild_id:    row.get(offset + 3)?,
      created_at:  row.get(offset + 4)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:     decode_uuid(&self.user_id)?,
      platform_id: self.platform_id,
      name:        self.name,
      guild_id:    decode_uuid(&self.guild_id)?,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Select list for a quote joined with its speaker (`sp`) and submitter (`su`).
pub const QUOTE_SELECT: &str = "
  SELECT
    q.quote_id, q.content, q.guild_id, q.created_at,
    sp.user_id, sp.platform_id, sp.name, sp.guild_id, sp.created_at,
    su.user_id, su.platform_id, su.name, su.guild_id, su.created_at
  FROM quotes q
  JOIN users sp ON sp.user_id = q.speaker_id
  JOIN users su ON su.user_id = q.submitter_id";

/// Raw strings read from a `quotes` row joined with both user rows.
pub struct RawQuote {
  pub quote_id:   String,
  pub content:    String,
  pub guild_id:   String,
  pub created_at: String,
  pub speaker:    RawUser,
  pub submitter:  RawUser,
}

impl RawQuote {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      quote_id:   row.get(0)?,
      content:    row.get(1)?,
      guild_id:   row.get(2)?,
      created_at: row.get(3)?,
      speaker:    RawUser::from_row_at(row, 4)?,
      submitter:  RawUser::from_row_at(row, 9)?,
    })
  }

  pub fn into_quote(self) -> Result<Quote> {
    Ok(Quote {
      quote_id:   decode_uuid(&self.quote_id)?,
      content:    self.content,
      speaker:    self.speaker.into_user()?,
      submitter:  self.submitter.into_user()?,
      guild_id:   decode_uuid(&self.guild_id)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
