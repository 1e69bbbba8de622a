// File: prizebot-core/src/repositories/postgres/mod.rs

pub mod giveaways;
pub mod participants;

pub use giveaways::PostgresGiveawayRepository;
pub use participants::PostgresParticipantRepository;
