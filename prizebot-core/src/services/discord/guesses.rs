// File: prizebot-core/src/services/discord/guesses.rs

use tracing::{debug, error};
use twilight_model::channel::Message;

use crate::giveaway::{GuessMessage, GuessOutcome};
use crate::services::discord::DiscordContext;

pub fn guess_from_message(msg: &Message) -> GuessMessage {
    GuessMessage {
        channel_id: msg.channel_id.to_string(),
        message_id: msg.id.to_string(),
        author_id: msg.author.id.to_string(),
        author_is_bot: msg.author.bot,
        member_roles: msg
            .member
            .as_ref()
            .map(|m| m.roles.iter().map(|r| r.to_string()).collect())
            .unwrap_or_default(),
        content: msg.content.clone(),
    }
}

/// Feeds a gateway message into guess evaluation. Store errors are logged;
/// the message is simply not counted.
pub async fn handle_message_create(ctx: &DiscordContext, msg: &Message) {
    if msg.author.bot {
        return;
    }
    // cheap pre-check before cloning the message
    if !ctx.engine.index().contains(&msg.channel_id.to_string()) {
        return;
    }

    match ctx.engine.handle_guess(guess_from_message(msg)).await {
        Ok(GuessOutcome::Won) => debug!("Guess {} won its game", msg.id),
        Ok(outcome) => debug!("Guess {} by {} => {outcome:?}", msg.id, msg.author.id),
        Err(e) => error!("Failed to evaluate guess {}: {e:?}", msg.id),
    }
}
