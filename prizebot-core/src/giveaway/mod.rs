// File: prizebot-core/src/giveaway/mod.rs

pub mod cooldown;
pub mod draw;
pub mod duration;
pub mod engine;
pub mod index;
pub mod pending;
pub mod render;
pub mod surface;

pub use engine::{
    ClassicRequest, EditOutcome, EditRequest, GiveawayEngine, GiveawayPolicy, GuessMessage,
    GuessOutcome, GuessRequest, JoinOutcome, JoinRequest, RateLimitFeedback, Resolution,
};
pub use surface::{GiveawayCard, GiveawaySurface, Reaction, JOIN_BUTTON_ID};
