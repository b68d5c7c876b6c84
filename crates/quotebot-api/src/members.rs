//! Handlers for `/guilds/{guild}/members/{user}`.
//!
//! Both take `{"name":…}`. `PUT` registers a member the first time it is seen
//! and leaves a known member untouched; `PATCH` refreshes the display name.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
};
use quotebot_core::{
  store::QuoteStore,
  user::{Member, User},
};
use quotebot_service::QuoteService;
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct MemberBody {
  pub name: String,
}

fn member_from(id: String, Json(body): Json<MemberBody>) -> Result<Member, ApiError> {
  if body.name.trim().is_empty() {
    return Err(ApiError::BadRequest("member name must not be empty".into()));
  }
  Ok(Member { id, name: body.name })
}

/// `PUT /guilds/{guild}/members/{user}`
pub async fn observe<S>(
  State(service): State<Arc<QuoteService<S>>>,
  Path((guild, user)): Path<(String, String)>,
  body: Result<Json<MemberBody>, JsonRejection>,
) -> Result<Json<User>, ApiError>
where
  S: QuoteStore,
{
  let member = member_from(user, body?)?;
  Ok(Json(service.observe_member(&guild, &member).await?))
}

/// `PATCH /guilds/{guild}/members/{user}`
pub async fn update<S>(
  State(service): State<Arc<QuoteService<S>>>,
  Path((guild, user)): Path<(String, String)>,
  body: Result<Json<MemberBody>, JsonRejection>,
) -> Result<Json<User>, ApiError>
where
  S: QuoteStore,
{
  let member = member_from(user, body?)?;
  Ok(Json(service.update_member(&guild, &member).await?))
}
