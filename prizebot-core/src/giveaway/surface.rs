// File: prizebot-core/src/giveaway/surface.rs

use std::time::Duration;
use async_trait::async_trait;

use prizebot_common::Error;

/// Custom id of the join button on classic giveaway cards.
pub const JOIN_BUTTON_ID: &str = "join_giveaway";

/// A fully rendered giveaway message. Always produced from the structured
/// giveaway state by the functions in `giveaway::render`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiveawayCard {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub image_url: Option<String>,
    pub footer: Option<String>,
    /// Epoch milliseconds shown as the embed timestamp.
    pub timestamp_ms: Option<i64>,
    pub join_button: bool,
}

/// Reactions the bot puts on guesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reaction {
    /// Wrong guess, hints off.
    Miss,
    /// The secret number is above the guess.
    Higher,
    /// The secret number is below the guess.
    Lower,
    /// The guesser is still on cooldown.
    Cooldown,
}

impl Reaction {
    pub fn emoji(&self) -> &'static str {
        match self {
            Reaction::Miss => "❌",
            Reaction::Higher => "⬆️",
            Reaction::Lower => "⬇️",
            Reaction::Cooldown => "⏳",
        }
    }
}

/// Everything the lifecycle engine needs from the chat platform.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GiveawaySurface: Send + Sync {
    /// Posts a new card into `channel_id`, returning the new message id.
    async fn publish(&self, channel_id: &str, card: &GiveawayCard) -> Result<String, Error>;

    /// Replaces the whole content of an existing card.
    async fn update(&self, channel_id: &str, message_id: &str, card: &GiveawayCard) -> Result<(), Error>;

    async fn delete(&self, channel_id: &str, message_id: &str) -> Result<(), Error>;

    /// Opens a thread attached to `message_id`, returning the thread id.
    async fn open_thread(&self, channel_id: &str, message_id: &str, name: &str) -> Result<String, Error>;

    /// Plain text post into a channel or thread, returning the message id.
    async fn post(&self, channel_id: &str, content: &str) -> Result<String, Error>;

    async fn archive_thread(&self, thread_id: &str) -> Result<(), Error>;

    async fn react(&self, channel_id: &str, message_id: &str, reaction: Reaction) -> Result<(), Error>;

    /// Replies to `message_id` and removes the reply again after `ttl`.
    async fn reply_transient(
        &self,
        channel_id: &str,
        message_id: &str,
        content: &str,
        ttl: Duration,
    ) -> Result<(), Error>;
}
