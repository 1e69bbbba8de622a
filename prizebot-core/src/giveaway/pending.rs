// File: prizebot-core/src/giveaway/pending.rs

use dashmap::DashMap;

/// Guess-game parameters captured by `/guess_number`, waiting for the
/// organizer to submit the secret number.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingGuess {
    pub organizer_id: String,
    pub channel_id: String,
    pub guild_id: Option<String>,
    pub prize: String,
    pub duration_ms: i64,
    pub required_role_id: Option<String>,
    pub image_url: Option<String>,
    pub hints_enabled: bool,
    pub cooldown_ms: i64,
    pub created_at_ms: i64,
}

/// Keyed by organizer, so a second `/guess_number` overwrites the first.
#[derive(Debug, Default)]
pub struct PendingCreations {
    entries: DashMap<String, PendingGuess>,
}

impl PendingCreations {
    pub fn new() -> Self {
        Self { entries: DashMap::new() }
    }

    pub fn put(&self, pending: PendingGuess) {
        self.entries.insert(pending.organizer_id.clone(), pending);
    }

    /// Removes and returns the organizer's entry; a second call gets `None`.
    pub fn take(&self, organizer_id: &str) -> Option<PendingGuess> {
        self.entries.remove(organizer_id).map(|(_, p)| p)
    }

    /// Drops prompts abandoned for longer than `ttl_ms`.
    pub fn sweep(&self, now_ms: i64, ttl_ms: i64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, p| now_ms - p.created_at_ms < ttl_ms);
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
