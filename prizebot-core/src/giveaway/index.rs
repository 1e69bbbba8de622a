// File: prizebot-core/src/giveaway/index.rs
//
// In-memory projection of active guess games, keyed by thread id, so that
// every thread message can be evaluated without a store round-trip.

use dashmap::DashMap;

use prizebot_common::Error;
use prizebot_common::models::{Giveaway, GiveawayKind, TypeData};

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveGame {
    pub thread_id: String,
    pub message_id: String,
    pub channel_id: String,
    pub prize: String,
    pub image_url: Option<String>,
    pub secret_number: i64,
    pub required_role_id: Option<String>,
    pub end_timestamp: i64,
    pub hints_enabled: bool,
    pub cooldown_ms: i64,
}

impl ActiveGame {
    /// Projects a stored guess giveaway. Fails for classic rows and rows that
    /// never got a thread.
    pub fn from_giveaway(g: &Giveaway) -> Result<Self, Error> {
        let thread_id = g
            .thread_id
            .clone()
            .ok_or_else(|| Error::Parse(format!("guess giveaway {} has no thread", g.message_id)))?;
        match &g.type_data {
            TypeData::Guess { secret_number, required_role_id, hints_enabled, cooldown_ms }
                if g.kind == GiveawayKind::Guess =>
            {
                Ok(Self {
                    thread_id,
                    message_id: g.message_id.clone(),
                    channel_id: g.channel_id.clone(),
                    prize: g.prize.clone(),
                    image_url: g.image_url.clone(),
                    secret_number: *secret_number,
                    required_role_id: required_role_id.clone(),
                    end_timestamp: g.end_timestamp,
                    hints_enabled: *hints_enabled,
                    cooldown_ms: *cooldown_ms,
                })
            }
            _ => Err(Error::Parse(format!(
                "giveaway {} is not a guess game",
                g.message_id
            ))),
        }
    }
}

#[derive(Debug, Default)]
pub struct GameIndex {
    games: DashMap<String, ActiveGame>,
}

impl GameIndex {
    pub fn new() -> Self {
        Self { games: DashMap::new() }
    }

    pub fn insert(&self, game: ActiveGame) {
        self.games.insert(game.thread_id.clone(), game);
    }

    pub fn get(&self, thread_id: &str) -> Option<ActiveGame> {
        self.games.get(thread_id).map(|g| g.clone())
    }

    pub fn contains(&self, thread_id: &str) -> bool {
        self.games.contains_key(thread_id)
    }

    /// Only one caller gets `Some` back for a given thread.
    pub fn remove(&self, thread_id: &str) -> Option<ActiveGame> {
        self.games.remove(thread_id).map(|(_, g)| g)
    }

    /// Patches prize/deadline of the game whose display message is `message_id`.
    /// Returns whether a game was found.
    pub fn apply_edit(&self, message_id: &str, prize: Option<&str>, end_timestamp: Option<i64>) -> bool {
        let mut found = false;
        for mut entry in self.games.iter_mut() {
            if entry.message_id == message_id {
                if let Some(p) = prize {
                    entry.prize = p.to_string();
                }
                if let Some(end) = end_timestamp {
                    entry.end_timestamp = end;
                }
                found = true;
            }
        }
        found
    }

    pub fn clear(&self) {
        self.games.clear();
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}
