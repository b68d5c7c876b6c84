//! [`SqliteStore`] — the SQLite implementation of [`QuoteStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use quotebot_core::{
  guild::Guild,
  quote::{NewQuote, Quote, QuoteFilter},
  store::QuoteStore,
  user::User,
};

use crate::{
  encode::{
    encode_dt, encode_uuid, RawGuild, RawQuote, RawUser, GUILD_COLUMNS, QUOTE_SELECT,
    USER_COLUMNS,
  },
  schema::SCHEMA,
  Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A quotebot store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn guild_by_platform_id(&self, platform_id: String) -> Result<Option<Guild>> {
    let raw: Option<RawGuild> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {GUILD_COLUMNS} FROM guilds WHERE platform_id = ?1"),
            rusqlite::params![platform_id],
            RawGuild::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawGuild::into_guild).transpose()
  }

  async fn user_by_platform_id(
    &self,
    platform_id: String,
    guild_id:    Uuid,
  ) -> Result<Option<User>> {
    let guild_str = encode_uuid(guild_id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {USER_COLUMNS} FROM users WHERE platform_id = ?1 AND guild_id = ?2"
            ),
            rusqlite::params![platform_id, guild_str],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }
}

// ─── QuoteStore impl ─────────────────────────────────────────────────────────

impl QuoteStore for SqliteStore {
  type Error = crate::Error;

  // ── Guilds ────────────────────────────────────────────────────────────────

  async fn guild_exists(&self, platform_id: &str) -> Result<bool> {
    let platform_id = platform_id.to_owned();

    let exists = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT 1 FROM guilds WHERE platform_id = ?1",
            rusqlite::params![platform_id],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false))
      })
      .await?;

    Ok(exists)
  }

  async fn find_guild(&self, platform_id: &str) -> Result<Option<Guild>> {
    self.guild_by_platform_id(platform_id.to_owned()).await
  }

  async fn add_guild(&self, platform_id: &str, name: &str) -> Result<Guild> {
    let id_str   = encode_uuid(Uuid::new_v4());
    let at_str   = encode_dt(Utc::now());
    let pid      = platform_id.to_owned();
    let name_str = name.to_owned();

    let raw: RawGuild = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO guilds (guild_id, platform_id, name, created_at)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (platform_id) DO NOTHING",
          rusqlite::params![id_str, pid, name_str, at_str],
        )?;
        Ok(conn.query_row(
          &format!("SELECT {GUILD_COLUMNS} FROM guilds WHERE platform_id = ?1"),
          rusqlite::params![pid],
          RawGuild::from_row,
        )?)
      })
      .await?;

    raw.into_guild()
  }

  async fn rename_guild(&self, platform_id: &str, name: &str) -> Result<Option<Guild>> {
    let pid      = platform_id.to_owned();
    let name_str = name.to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE guilds SET name = ?2 WHERE platform_id = ?1",
          rusqlite::params![pid, name_str],
        )?;
        Ok(())
      })
      .await?;

    self.guild_by_platform_id(platform_id.to_owned()).await
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn user_exists(&self, platform_id: &str, guild_id: Uuid) -> Result<bool> {
    let pid       = platform_id.to_owned();
    let guild_str = encode_uuid(guild_id);

    let exists = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT 1 FROM users WHERE platform_id = ?1 AND guild_id = ?2",
            rusqlite::params![pid, guild_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false))
      })
      .await?;

    Ok(exists)
  }

  async fn find_user(&self, platform_id: &str, guild_id: Uuid) -> Result<Option<User>> {
    self.user_by_platform_id(platform_id.to_owned(), guild_id).await
  }

  async fn find_user_by_name(&self, name: &str, guild_id: Uuid) -> Result<Option<User>> {
    let name_str  = name.to_owned();
    let guild_str = encode_uuid(guild_id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {USER_COLUMNS} FROM users
               WHERE name = ?1 AND guild_id = ?2
               ORDER BY created_at, rowid
               LIMIT 1"
            ),
            rusqlite::params![name_str, guild_str],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn add_user(&self, platform_id: &str, name: &str, guild_id: Uuid) -> Result<User> {
    let id_str    = encode_uuid(Uuid::new_v4());
    let at_str    = encode_dt(Utc::now());
    let pid       = platform_id.to_owned();
    let name_str  = name.to_owned();
    let guild_str = encode_uuid(guild_id);

    let raw: RawUser = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (user_id, platform_id, name, guild_id, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT (platform_id, guild_id) DO NOTHING",
          rusqlite::params![id_str, pid, name_str, guild_str, at_str],
        )?;
        Ok(conn.query_row(
          &format!(
            "SELECT {USER_COLUMNS} FROM users WHERE platform_id = ?1 AND guild_id = ?2"
          ),
          rusqlite::params![pid, guild_str],
          RawUser::from_row,
        )?)
      })
      .await?;

    raw.into_user()
  }

  async fn rename_user(
    &self,
    platform_id: &str,
    guild_id:    Uuid,
    name:        &str,
  ) -> Result<Option<User>> {
    let pid       = platform_id.to_owned();
    let guild_str = encode_uuid(guild_id);
    let name_str  = name.to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE users SET name = ?3 WHERE platform_id = ?1 AND guild_id = ?2",
          rusqlite::params![pid, guild_str, name_str],
        )?;
        Ok(())
      })
      .await?;

    self.user_by_platform_id(platform_id.to_owned(), guild_id).await
  }

  // ── Quotes ────────────────────────────────────────────────────────────────

  async fn quote_exists(&self, content: &str, speaker_id: Uuid) -> Result<bool> {
    let content_str = content.to_owned();
    let speaker_str = encode_uuid(speaker_id);

    let exists = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT 1 FROM quotes WHERE content = ?1 AND speaker_id = ?2",
            rusqlite::params![content_str, speaker_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false))
      })
      .await?;

    Ok(exists)
  }

  async fn insert_quote(&self, input: NewQuote) -> Result<Option<Quote>> {
    let quote = Quote {
      quote_id:   Uuid::new_v4(),
      content:    input.content,
      speaker:    input.speaker,
      submitter:  input.submitter,
      guild_id:   input.guild_id,
      created_at: Utc::now(),
    };

    let quote_id_str  = encode_uuid(quote.quote_id);
    let content_str   = quote.content.clone();
    let speaker_str   = encode_uuid(quote.speaker.user_id);
    let submitter_str = encode_uuid(quote.submitter.user_id);
    let guild_str     = encode_uuid(quote.guild_id);
    let at_str        = encode_dt(quote.created_at);

    let inserted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT INTO quotes (
             quote_id, content, speaker_id, submitter_id, guild_id, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
           ON CONFLICT (content, speaker_id) DO NOTHING",
          rusqlite::params![
            quote_id_str,
            content_str,
            speaker_str,
            submitter_str,
            guild_str,
            at_str,
          ],
        )?)
      })
      .await?;

    Ok((inserted == 1).then_some(quote))
  }

  async fn find_quotes(&self, filter: QuoteFilter) -> Result<Vec<Quote>> {
    let guild_str   = encode_uuid(filter.guild_id);
    let speaker_str = filter.speaker_id.map(encode_uuid);

    let raws: Vec<RawQuote> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "{QUOTE_SELECT}
           WHERE q.guild_id = ?1
             AND (?2 IS NULL OR q.speaker_id = ?2)"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![guild_str, speaker_str], RawQuote::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawQuote::into_quote).collect()
  }
}
