//! Router tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use quotebot_service::{QuoteService, ServiceConfig};
use quotebot_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::api_router;

async fn make_service() -> Arc<QuoteService<SqliteStore>> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  Arc::new(QuoteService::new(Arc::new(store), ServiceConfig::default()))
}

async fn send(
  service: &Arc<QuoteService<SqliteStore>>,
  method:  &str,
  uri:     &str,
  body:    Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  let resp = api_router(service.clone()).oneshot(builder.body(body).unwrap()).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
  (status, value)
}

async fn observe_alpha(service: &Arc<QuoteService<SqliteStore>>) {
  let (status, _) = send(
    service,
    "PUT",
    "/guilds/g-alpha",
    Some(json!({
      "name": "Alpha",
      "members": [{ "id": "u-bea", "name": "Bea" }, { "id": "u-cid", "name": "Cid" }],
    })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
}

fn submission(content: &str, speaker: (&str, &str), submitter: (&str, &str)) -> Value {
  json!({
    "content":   content,
    "speaker":   { "id": speaker.0, "name": speaker.1 },
    "submitter": { "id": submitter.0, "name": submitter.1 },
  })
}

// ── Guild events ───────────────────────────────────────────────────────────

#[tokio::test]
async fn observe_guild_reports_new_members() {
  let service = make_service().await;
  let (status, body) = send(
    &service,
    "PUT",
    "/guilds/g-alpha",
    Some(json!({ "name": "Alpha", "members": [{ "id": "u-bea", "name": "Bea" }] })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["guild"]["platform_id"], "g-alpha");
  assert_eq!(body["users_added"], 1);

  let (_, again) = send(
    &service,
    "PUT",
    "/guilds/g-alpha",
    Some(json!({ "name": "Alpha", "members": [{ "id": "u-bea", "name": "Bea" }] })),
  )
  .await;
  assert_eq!(again["users_added"], 0);
  assert_eq!(again["guild"]["guild_id"], body["guild"]["guild_id"]);
}

#[tokio::test]
async fn observe_guild_rejects_blank_name() {
  let service = make_service().await;
  let (status, body) =
    send(&service, "PUT", "/guilds/g-alpha", Some(json!({ "name": "  " }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn rename_unknown_guild_is_404() {
  let service = make_service().await;
  let (status, _) =
    send(&service, "PATCH", "/guilds/g-nowhere", Some(json!({ "name": "Elsewhere" }))).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rename_guild_updates_name() {
  let service = make_service().await;
  observe_alpha(&service).await;
  let (status, body) =
    send(&service, "PATCH", "/guilds/g-alpha", Some(json!({ "name": "Alpha Prime" }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["name"], "Alpha Prime");
}

// ── Member events ──────────────────────────────────────────────────────────

#[tokio::test]
async fn member_observe_then_update() {
  let service = make_service().await;
  observe_alpha(&service).await;

  let (status, created) =
    send(&service, "PUT", "/guilds/g-alpha/members/u-dee", Some(json!({ "name": "Dee" }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(created["name"], "Dee");

  let (status, updated) = send(
    &service,
    "PATCH",
    "/guilds/g-alpha/members/u-dee",
    Some(json!({ "name": "Deedee" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(updated["name"], "Deedee");
  assert_eq!(updated["user_id"], created["user_id"]);
}

#[tokio::test]
async fn blank_member_name_is_400() {
  let service = make_service().await;
  observe_alpha(&service).await;

  let (status, body) =
    send(&service, "PUT", "/guilds/g-alpha/members/u-dee", Some(json!({ "name": " " }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());

  let (status, _) =
    send(&service, "PATCH", "/guilds/g-alpha/members/u-bea", Some(json!({ "name": "" }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (_, bea) =
    send(&service, "PUT", "/guilds/g-alpha/members/u-bea", Some(json!({ "name": "Ignored" }))).await;
  assert_eq!(bea["name"], "Bea");
}

#[tokio::test]
async fn member_in_unknown_guild_is_404() {
  let service = make_service().await;
  let (status, _) =
    send(&service, "PUT", "/guilds/g-nowhere/members/u-dee", Some(json!({ "name": "Dee" }))).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Adding quotes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn add_quote_created_then_duplicate_rejected() {
  let service = make_service().await;
  observe_alpha(&service).await;
  let quote = submission("hello there", ("u-bea", "Bea"), ("u-cid", "Cid"));

  let (status, body) = send(&service, "POST", "/guilds/g-alpha/quotes", Some(quote.clone())).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["outcome"], "added");
  assert_eq!(body["quote"]["content"], "hello there");
  assert_eq!(body["quote"]["speaker"]["name"], "Bea");
  assert_eq!(body["quote"]["submitter"]["name"], "Cid");

  let (status, body) = send(&service, "POST", "/guilds/g-alpha/quotes", Some(quote)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["outcome"], "rejected");
  assert_eq!(body["reason"], "duplicate content");
  assert!(body["message"].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn add_empty_quote_rejected() {
  let service = make_service().await;
  observe_alpha(&service).await;
  let (status, body) = send(
    &service,
    "POST",
    "/guilds/g-alpha/quotes",
    Some(submission("   ", ("u-bea", "Bea"), ("u-cid", "Cid"))),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["outcome"], "rejected");
  assert_eq!(body["reason"], "empty content");
}

#[tokio::test]
async fn add_quote_to_unknown_guild_is_404() {
  let service = make_service().await;
  let (status, body) = send(
    &service,
    "POST",
    "/guilds/g-nowhere/quotes",
    Some(submission("hi", ("u-bea", "Bea"), ("u-cid", "Cid"))),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].as_str().unwrap().contains("g-nowhere"));
}

#[tokio::test]
async fn add_quote_without_speaker_id_is_400() {
  let service = make_service().await;
  observe_alpha(&service).await;
  let (status, _) = send(
    &service,
    "POST",
    "/guilds/g-alpha/quotes",
    Some(submission("hi", ("", "Bea"), ("u-cid", "Cid"))),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_body_is_400() {
  let service = make_service().await;
  observe_alpha(&service).await;
  let (status, body) =
    send(&service, "POST", "/guilds/g-alpha/quotes", Some(json!({ "content": "hi" }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn non_numeric_amount_is_400() {
  let service = make_service().await;
  observe_alpha(&service).await;
  let (status, _) = send(&service, "GET", "/guilds/g-alpha/quotes?amount=lots", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Random quotes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn random_quotes_respects_amount_and_speaker() {
  let service = make_service().await;
  observe_alpha(&service).await;
  for text in ["b1", "b2", "b3"] {
    send(
      &service,
      "POST",
      "/guilds/g-alpha/quotes",
      Some(submission(text, ("u-bea", "Bea"), ("u-cid", "Cid"))),
    )
    .await;
  }
  send(
    &service,
    "POST",
    "/guilds/g-alpha/quotes",
    Some(submission("c1", ("u-cid", "Cid"), ("u-bea", "Bea"))),
  )
  .await;

  let (status, body) = send(&service, "GET", "/guilds/g-alpha/quotes", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body.as_array().unwrap().len(), 1);

  let (_, body) = send(&service, "GET", "/guilds/g-alpha/quotes?amount=50", None).await;
  assert_eq!(body.as_array().unwrap().len(), 4);

  let (_, body) =
    send(&service, "GET", "/guilds/g-alpha/quotes?speaker=u-bea&amount=2", None).await;
  let quotes = body.as_array().unwrap();
  assert_eq!(quotes.len(), 2);
  assert!(quotes.iter().all(|q| q["speaker"]["platform_id"] == "u-bea"));
  assert_ne!(quotes[0]["quote_id"], quotes[1]["quote_id"]);

  let (status, body) =
    send(&service, "GET", "/guilds/g-alpha/quotes?speaker=u-nobody", None).await;
  assert_eq!(status, StatusCode::OK);
  assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn random_quotes_unknown_guild_is_404() {
  let service = make_service().await;
  let (status, _) = send(&service, "GET", "/guilds/g-nowhere/quotes", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}
