//! Handlers for `/guilds/{guild}/quotes`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/guilds/{guild}/quotes` | Optional `?speaker=<user>&amount=<n>` |
//! | `POST` | `/guilds/{guild}/quotes` | Body: `{"content":…,"speaker":{…},"submitter":{…}}` |
//!
//! A rejected submission is answered with `200 OK` and
//! `{"outcome":"rejected","reason":…,"message":…}`; only an accepted one is
//! `201 Created`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, QueryRejection},
  },
  http::StatusCode,
  response::{IntoResponse, Response},
};
use quotebot_core::{
  quote::{AddOutcome, Quote, Rejection},
  store::QuoteStore,
  user::Member,
};
use quotebot_service::QuoteService;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

// ─── Random ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RandomParams {
  /// Platform ID of the speaker to restrict to.
  pub speaker: Option<String>,
  /// Requested number of quotes; clamped by the service.
  pub amount:  Option<i64>,
}

/// `GET /guilds/{guild}/quotes[?speaker=<user>][&amount=<n>]`
pub async fn random<S>(
  State(service): State<Arc<QuoteService<S>>>,
  Path(guild): Path<String>,
  params: Result<Query<RandomParams>, QueryRejection>,
) -> Result<Json<Vec<Quote>>, ApiError>
where
  S: QuoteStore,
{
  let Query(params) = params?;
  let quotes = service
    .random_quotes(&guild, params.speaker.as_deref(), params.amount)
    .await?;
  Ok(Json(quotes))
}

// ─── Add ──────────────────────────────────────────────────────────────────────

/// A quote submission. The "quote this message" command uses the same shape,
/// with the message author as speaker and the invoking member as submitter.
#[derive(Debug, Deserialize)]
pub struct AddBody {
  pub content:   String,
  pub speaker:   Member,
  pub submitter: Member,
}

#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
enum AddResponse {
  Added { quote: Quote },
  Rejected { reason: Rejection, message: &'static str },
}

/// `POST /guilds/{guild}/quotes`
pub async fn add<S>(
  State(service): State<Arc<QuoteService<S>>>,
  Path(guild): Path<String>,
  body: Result<Json<AddBody>, JsonRejection>,
) -> Result<Response, ApiError>
where
  S: QuoteStore,
{
  let Json(body) = body?;
  if body.speaker.id.is_empty() || body.submitter.id.is_empty() {
    return Err(ApiError::BadRequest("speaker and submitter ids are required".into()));
  }

  let outcome = service
    .add_quote(&body.content, &body.speaker, &body.submitter, &guild)
    .await?;

  let response = match outcome {
    AddOutcome::Added { quote } => {
      (StatusCode::CREATED, Json(AddResponse::Added { quote })).into_response()
    }
    AddOutcome::Rejected { reason } => (
      StatusCode::OK,
      Json(AddResponse::Rejected { reason, message: reason.message() }),
    )
      .into_response(),
  };
  Ok(response)
}
