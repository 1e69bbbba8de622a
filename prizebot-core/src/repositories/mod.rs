// File: prizebot-core/src/repositories/mod.rs

pub mod postgres;

pub use postgres::giveaways::PostgresGiveawayRepository;
pub use postgres::participants::PostgresParticipantRepository;
