//! User — a platform member scoped to a single guild.
//!
//! The same platform account seen in two guilds is two distinct users; the
//! pair `(platform_id, guild_id)` is unique.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub user_id:     Uuid,
  pub platform_id: String,
  pub name:        String,
  pub guild_id:    Uuid,
  pub created_at:  DateTime<Utc>,
}

/// A platform member reference as it arrives on an event: the platform's own
/// account ID and its current display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
  pub id:   String,
  pub name: String,
}

impl Member {
  pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
    Self { id: id.into(), name: name.into() }
  }
}
