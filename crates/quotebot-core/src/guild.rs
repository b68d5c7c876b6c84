//! Guild — one chat community mirrored from the platform.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::Member;

/// A community known to the store. `platform_id` is unique across guilds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guild {
  pub guild_id:    Uuid,
  pub platform_id: String,
  pub name:        String,
  pub created_at:  DateTime<Utc>,
}

/// A "community observed" event as delivered by the platform adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservedGuild {
  pub platform_id: String,
  pub name:        String,
  #[serde(default)]
  pub members:     Vec<Member>,
}
