// File: prizebot-core/src/services/discord/mod.rs
//
// Discord-facing services: slash commands, the join button, the secret-number
// modal and the thread guess listener. Everything funnels into the shared
// `GiveawayEngine`.

pub mod guesses;
pub mod interactions;
pub mod join_button;
pub mod secret_modal;
pub mod slashcommands;

use std::sync::Arc;

use twilight_http::Client as HttpClient;
use twilight_model::id::Id;
use twilight_model::id::marker::ApplicationMarker;

use crate::giveaway::GiveawayEngine;

/// What every Discord handler needs.
#[derive(Clone)]
pub struct DiscordContext {
    pub http: Arc<HttpClient>,
    pub application_id: Id<ApplicationMarker>,
    pub engine: Arc<GiveawayEngine>,
}
