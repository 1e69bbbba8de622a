// File: prizebot-core/src/services/mod.rs

pub mod discord;
