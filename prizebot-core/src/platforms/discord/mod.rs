// File: prizebot-core/src/platforms/discord/mod.rs

pub mod runtime;
pub mod surface;

pub use runtime::DiscordPlatform;
pub use surface::DiscordSurface;
