// File: prizebot-core/src/services/discord/join_button.rs

use tracing::debug;
use twilight_model::application::interaction::Interaction;

use prizebot_common::error::Error;

use crate::giveaway::{JoinOutcome, JoinRequest};
use crate::services::discord::DiscordContext;
use crate::services::discord::interactions::{HandlerReply, invoking_user, member_roles};

/// The "Join Giveaway" button on a classic card.
pub async fn handle(ctx: &DiscordContext, interaction: &Interaction) -> Result<HandlerReply, Error> {
    let message_id = interaction
        .message
        .as_ref()
        .map(|m| m.id.to_string())
        .ok_or_else(|| Error::Platform("Button interaction without a message".into()))?;

    let request = JoinRequest {
        message_id,
        user_id: invoking_user(interaction)?,
        member_roles: member_roles(interaction),
    };

    let text = match ctx.engine.join(request).await? {
        JoinOutcome::Joined { participants } => {
            debug!("Giveaway now has {participants:?} participants");
            "✅ You have joined the giveaway!".to_string()
        }
        JoinOutcome::AlreadyJoined => Error::AlreadyJoined.user_message(),
    };
    Ok(HandlerReply::Ephemeral(text))
}
