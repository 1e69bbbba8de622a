// File: prizebot-common/src/models/giveaway.rs

use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Guess games never allow faster guessing than this.
pub const MIN_COOLDOWN_MS: i64 = 15_000;
pub const DEFAULT_COOLDOWN_MS: i64 = 60_000;
/// Longest prize text; keeps card titles under Discord's 256-character cap.
pub const MAX_PRIZE_CHARS: usize = 200;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GiveawayKind {
    Classic,
    Guess,
}

impl fmt::Display for GiveawayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GiveawayKind::Classic => write!(f, "classic"),
            GiveawayKind::Guess => write!(f, "guess"),
        }
    }
}

impl FromStr for GiveawayKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "classic" => Ok(GiveawayKind::Classic),
            "guess" => Ok(GiveawayKind::Guess),
            other => Err(format!("Unknown giveaway kind: {other}")),
        }
    }
}

/// `Active -> Ended` is the only transition a giveaway ever makes.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GiveawayStatus {
    Active,
    Ended,
}

impl fmt::Display for GiveawayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GiveawayStatus::Active => write!(f, "active"),
            GiveawayStatus::Ended => write!(f, "ended"),
        }
    }
}

impl FromStr for GiveawayStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(GiveawayStatus::Active),
            "ended" => Ok(GiveawayStatus::Ended),
            other => Err(format!("Unknown giveaway status: {other}")),
        }
    }
}

fn default_winner_count() -> u32 {
    1
}

fn default_cooldown_ms() -> i64 {
    DEFAULT_COOLDOWN_MS
}

/// Type-specific settings, stored as a JSON document next to the giveaway row.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TypeData {
    Classic {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        required_role_id: Option<String>,
        #[serde(default = "default_winner_count")]
        winner_count: u32,
    },
    Guess {
        secret_number: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        required_role_id: Option<String>,
        #[serde(default)]
        hints_enabled: bool,
        #[serde(default = "default_cooldown_ms")]
        cooldown_ms: i64,
    },
}

impl TypeData {
    pub fn kind(&self) -> GiveawayKind {
        match self {
            TypeData::Classic { .. } => GiveawayKind::Classic,
            TypeData::Guess { .. } => GiveawayKind::Guess,
        }
    }

    pub fn required_role_id(&self) -> Option<&str> {
        match self {
            TypeData::Classic { required_role_id, .. } | TypeData::Guess { required_role_id, .. } => {
                required_role_id.as_deref()
            }
        }
    }
}

/// One row of the `giveaways` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Giveaway {
    /// Id of the display message; doubles as the primary key.
    pub message_id: String,
    pub channel_id: String,
    pub thread_id: Option<String>,
    pub guild_id: Option<String>,
    pub organizer_id: String,
    pub prize: String,
    pub image_url: Option<String>,
    /// Epoch milliseconds.
    pub end_timestamp: i64,
    pub kind: GiveawayKind,
    pub status: GiveawayStatus,
    pub type_data: TypeData,
    pub created_at: DateTime<Utc>,
}

impl Giveaway {
    pub fn is_active(&self) -> bool {
        self.status == GiveawayStatus::Active
    }

    pub fn required_role_id(&self) -> Option<&str> {
        self.type_data.required_role_id()
    }
}

/// Everything needed to insert a giveaway; status always starts out active.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGiveaway {
    pub message_id: String,
    pub channel_id: String,
    pub thread_id: Option<String>,
    pub guild_id: Option<String>,
    pub organizer_id: String,
    pub prize: String,
    pub image_url: Option<String>,
    pub end_timestamp: i64,
    pub type_data: TypeData,
}

impl NewGiveaway {
    /// The row as it looks right after insertion.
    pub fn to_giveaway(&self, created_at: DateTime<Utc>) -> Giveaway {
        Giveaway {
            message_id: self.message_id.clone(),
            channel_id: self.channel_id.clone(),
            thread_id: self.thread_id.clone(),
            guild_id: self.guild_id.clone(),
            organizer_id: self.organizer_id.clone(),
            prize: self.prize.clone(),
            image_url: self.image_url.clone(),
            end_timestamp: self.end_timestamp,
            kind: self.type_data.kind(),
            status: GiveawayStatus::Active,
            type_data: self.type_data.clone(),
            created_at,
        }
    }
}

/// Columns an edit may touch. `None` leaves the column alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GiveawayPatch {
    pub prize: Option<String>,
    pub end_timestamp: Option<i64>,
}

impl GiveawayPatch {
    pub fn is_empty(&self) -> bool {
        self.prize.is_none() && self.end_timestamp.is_none()
    }
}

/// One classic-giveaway entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Participant {
    pub giveaway_id: String,
    pub user_id: String,
    /// Epoch milliseconds.
    pub joined_at: i64,
}
