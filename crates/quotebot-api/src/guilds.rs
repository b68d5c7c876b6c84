//! Handlers for `/guilds/{guild}`.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `PUT`   | `/guilds/{guild}` | Community observed. Body: `{"name":…,"members":[{"id":…,"name":…}]}` |
//! | `PATCH` | `/guilds/{guild}` | Guild updated. Body: `{"name":…}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
};
use quotebot_core::{
  guild::{Guild, ObservedGuild},
  store::QuoteStore,
  user::Member,
};
use quotebot_service::{GuildSync, QuoteService};
use serde::Deserialize;

use crate::error::ApiError;

// ─── Observe ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ObserveBody {
  pub name:    String,
  #[serde(default)]
  pub members: Vec<Member>,
}

/// `PUT /guilds/{guild}`
pub async fn observe<S>(
  State(service): State<Arc<QuoteService<S>>>,
  Path(guild): Path<String>,
  body: Result<Json<ObserveBody>, JsonRejection>,
) -> Result<Json<GuildSync>, ApiError>
where
  S: QuoteStore,
{
  let Json(body) = body?;
  if body.name.trim().is_empty() {
    return Err(ApiError::BadRequest("guild name must not be empty".into()));
  }
  if body.members.iter().any(|m| m.id.is_empty()) {
    return Err(ApiError::BadRequest("member id must not be empty".into()));
  }

  let sync = service
    .observe_guild(ObservedGuild { platform_id: guild, name: body.name, members: body.members })
    .await?;
  Ok(Json(sync))
}

// ─── Rename ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RenameBody {
  pub name: String,
}

/// `PATCH /guilds/{guild}`
pub async fn rename<S>(
  State(service): State<Arc<QuoteService<S>>>,
  Path(guild): Path<String>,
  body: Result<Json<RenameBody>, JsonRejection>,
) -> Result<Json<Guild>, ApiError>
where
  S: QuoteStore,
{
  let Json(body) = body?;
  if body.name.trim().is_empty() {
    return Err(ApiError::BadRequest("guild name must not be empty".into()));
  }
  Ok(Json(service.rename_guild(&guild, &body.name).await?))
}
