//! [`QuoteService`] — event handling and the quote upsert workflow.

use std::sync::Arc;

use quotebot_core::{
  guild::{Guild, ObservedGuild},
  quote::{AddOutcome, NewQuote, Quote, QuoteFilter, Rejection},
  sample::{choose_n, clamp_amount},
  store::QuoteStore,
  user::{Member, User},
};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

use crate::{
  config::ServiceConfig,
  migration::{MigrationReport, MigrationRunner},
  Error, Result,
};

/// Summary of a "community observed" event.
#[derive(Debug, Clone, Serialize)]
pub struct GuildSync {
  pub guild:       Guild,
  /// Members seen for the first time in this guild.
  pub users_added: usize,
  /// Present only when this event ran the legacy migration to completion.
  pub migration:   Option<MigrationReport>,
}

/// The quotebot context: a store handle plus the settings and migration state
/// every operation needs. Construct once at startup and share behind an
/// [`Arc`].
pub struct QuoteService<S> {
  store:      Arc<S>,
  max_amount: usize,
  migration:  Option<Mutex<MigrationRunner>>,
}

impl<S: QuoteStore> QuoteService<S> {
  pub fn new(store: Arc<S>, config: ServiceConfig) -> Self {
    Self {
      store,
      max_amount: config.max_amount,
      migration: config.migration.map(|cfg| Mutex::new(MigrationRunner::new(cfg))),
    }
  }

  pub fn store(&self) -> &S { &self.store }

  pub fn max_amount(&self) -> usize { self.max_amount }

  /// The legacy migration runner, if migration is configured.
  pub fn migration(&self) -> Option<&Mutex<MigrationRunner>> { self.migration.as_ref() }

  // ── Membership events ─────────────────────────────────────────────────────

  /// Handle a "community observed" event: register the guild on first sight,
  /// register unknown members, then give the legacy migration a chance to run.
  #[instrument(skip_all, fields(guild = %event.platform_id))]
  pub async fn observe_guild(&self, event: ObservedGuild) -> Result<GuildSync> {
    let guild = match self
      .store
      .find_guild(&event.platform_id)
      .await
      .map_err(Error::store)?
    {
      Some(existing) if existing.name != event.name => self
        .store
        .rename_guild(&event.platform_id, &event.name)
        .await
        .map_err(Error::store)?
        .unwrap_or(existing),
      Some(existing) => existing,
      None => {
        let guild = self
          .store
          .add_guild(&event.platform_id, &event.name)
          .await
          .map_err(Error::store)?;
        info!(name = %guild.name, "guild added");
        guild
      }
    };

    let mut users_added = 0;
    for member in &event.members {
      if self
        .store
        .user_exists(&member.id, guild.guild_id)
        .await
        .map_err(Error::store)?
      {
        continue;
      }
      self
        .store
        .add_user(&member.id, &member.name, guild.guild_id)
        .await
        .map_err(Error::store)?;
      users_added += 1;
    }
    debug!(users_added, members = event.members.len(), "members synced");

    let migration = self.attempt_migration(&guild).await;

    Ok(GuildSync { guild, users_added, migration })
  }

  /// Handle a "guild updated" event.
  #[instrument(skip(self))]
  pub async fn rename_guild(&self, platform_id: &str, name: &str) -> Result<Guild> {
    self
      .store
      .rename_guild(platform_id, name)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| quotebot_core::Error::GuildNotFound(platform_id.to_owned()).into())
  }

  /// Handle a "member added" event. Returns the stored user, which is the
  /// existing record if the member was already known.
  #[instrument(skip(self, member), fields(member = %member.id))]
  pub async fn observe_member(&self, guild_platform_id: &str, member: &Member) -> Result<User> {
    let guild = self.require_guild(guild_platform_id).await?;
    self.ensure_user(member, &guild).await
  }

  /// Handle a "member updated" event: refresh the stored display name,
  /// creating the user if it was never seen.
  #[instrument(skip(self, member), fields(member = %member.id))]
  pub async fn update_member(&self, guild_platform_id: &str, member: &Member) -> Result<User> {
    let guild = self.require_guild(guild_platform_id).await?;
    match self
      .store
      .rename_user(&member.id, guild.guild_id, &member.name)
      .await
      .map_err(Error::store)?
    {
      Some(user) => Ok(user),
      None => self
        .store
        .add_user(&member.id, &member.name, guild.guild_id)
        .await
        .map_err(Error::store),
    }
  }

  // ── Quotes ────────────────────────────────────────────────────────────────

  /// Add a quote on behalf of `submitter`.
  ///
  /// The guild must already be registered. The speaker is created before the
  /// duplicate check, the submitter only after it, so a rejected duplicate
  /// never creates a user record for the submitter.
  #[instrument(
    skip(self, content, speaker, submitter),
    fields(speaker = %speaker.id, submitter = %submitter.id)
  )]
  pub async fn add_quote(
    &self,
    content: &str,
    speaker: &Member,
    submitter: &Member,
    guild_platform_id: &str,
  ) -> Result<AddOutcome> {
    let content = content.trim();
    if content.is_empty() {
      debug!("rejected empty quote");
      return Ok(Rejection::EmptyContent.into());
    }

    let guild = self.require_guild(guild_platform_id).await?;
    let speaker = self.ensure_user(speaker, &guild).await?;

    if self
      .store
      .quote_exists(content, speaker.user_id)
      .await
      .map_err(Error::store)?
    {
      debug!("rejected duplicate quote");
      return Ok(Rejection::DuplicateContent.into());
    }

    let submitter = self.ensure_user(submitter, &guild).await?;
    self.insert(content, speaker, submitter, &guild).await
  }

  /// Add a quote whose speaker, submitter and guild are already resolved.
  /// No users are created; the empty and duplicate rules still apply.
  pub async fn add_resolved_quote(
    &self,
    content: &str,
    speaker: &User,
    submitter: &User,
    guild: &Guild,
  ) -> Result<AddOutcome> {
    let content = content.trim();
    if content.is_empty() {
      return Ok(Rejection::EmptyContent.into());
    }

    if self
      .store
      .quote_exists(content, speaker.user_id)
      .await
      .map_err(Error::store)?
    {
      return Ok(Rejection::DuplicateContent.into());
    }

    self.insert(content, speaker.clone(), submitter.clone(), guild).await
  }

  /// Pick up to `amount` random quotes from a guild, optionally restricted to
  /// one speaker. `amount` is clamped to `[1, max_amount]`; a speaker that has
  /// never been seen in the guild yields no quotes.
  #[instrument(skip(self))]
  pub async fn random_quotes(
    &self,
    guild_platform_id: &str,
    speaker: Option<&str>,
    amount: Option<i64>,
  ) -> Result<Vec<Quote>> {
    let amount = clamp_amount(amount, self.max_amount);
    let guild = self.require_guild(guild_platform_id).await?;

    let filter = match speaker {
      None => QuoteFilter::guild(guild.guild_id),
      Some(platform_id) => match self
        .store
        .find_user(platform_id, guild.guild_id)
        .await
        .map_err(Error::store)?
      {
        Some(user) => QuoteFilter::speaker(guild.guild_id, user.user_id),
        None => return Ok(Vec::new()),
      },
    };

    let candidates = self.store.find_quotes(filter).await.map_err(Error::store)?;
    let available = candidates.len();
    let mut rng = rand::thread_rng();
    let chosen = choose_n(candidates, amount, &mut rng);
    debug!(available, returned = chosen.len(), "quotes sampled");
    Ok(chosen)
  }

  // ── Helpers ───────────────────────────────────────────────────────────────

  async fn require_guild(&self, platform_id: &str) -> Result<Guild> {
    self
      .store
      .find_guild(platform_id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| quotebot_core::Error::GuildNotFound(platform_id.to_owned()).into())
  }

  async fn ensure_user(&self, member: &Member, guild: &Guild) -> Result<User> {
    if let Some(user) = self
      .store
      .find_user(&member.id, guild.guild_id)
      .await
      .map_err(Error::store)?
    {
      return Ok(user);
    }

    let user = self
      .store
      .add_user(&member.id, &member.name, guild.guild_id)
      .await
      .map_err(Error::store)?;
    info!(user = %user.platform_id, name = %user.name, "user added");
    Ok(user)
  }

  async fn insert(
    &self,
    content: &str,
    speaker: User,
    submitter: User,
    guild: &Guild,
  ) -> Result<AddOutcome> {
    let input = NewQuote {
      content: content.to_owned(),
      speaker,
      submitter,
      guild_id: guild.guild_id,
    };

    match self.store.insert_quote(input).await.map_err(Error::store)? {
      Some(quote) => {
        info!(
          speaker = %quote.speaker.name,
          submitter = %quote.submitter.name,
          "quote added"
        );
        Ok(AddOutcome::Added { quote })
      }
      None => {
        warn!("concurrent duplicate quote rejected by store");
        Ok(Rejection::DuplicateContent.into())
      }
    }
  }

  async fn attempt_migration(&self, guild: &Guild) -> Option<MigrationReport> {
    // A locked runner is already migrating on behalf of another event.
    let Ok(mut runner) = self.migration.as_ref()?.try_lock() else {
      debug!("legacy migration already running");
      return None;
    };
    match runner.attempt(self, guild).await {
      Ok(report) => report,
      Err(e) => {
        error!(error = %e, "legacy migration aborted");
        None
      }
    }
  }
}
