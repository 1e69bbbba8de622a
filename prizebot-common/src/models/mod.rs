// File: prizebot-common/src/models/mod.rs
pub mod giveaway;

pub use giveaway::{
    Giveaway, GiveawayKind, GiveawayStatus, NewGiveaway, GiveawayPatch, Participant, TypeData,
    DEFAULT_COOLDOWN_MS, MAX_PRIZE_CHARS, MIN_COOLDOWN_MS,
};
