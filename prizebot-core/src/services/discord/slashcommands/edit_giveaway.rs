// File: prizebot-core/src/services/discord/slashcommands/edit_giveaway.rs

use twilight_model::application::command::CommandType;
use twilight_model::application::interaction::Interaction;
use twilight_model::application::interaction::application_command::CommandData;
use twilight_model::guild::Permissions;
use twilight_util::builder::command::{CommandBuilder, StringBuilder};

use prizebot_common::error::Error;

use crate::giveaway::EditRequest;
use crate::services::discord::DiscordContext;
use crate::services::discord::interactions::HandlerReply;
use crate::services::discord::slashcommands::EDIT_GIVEAWAY;
use crate::services::discord::slashcommands::options::CommandOptions;

pub fn create_edit_giveaway_command() -> CommandBuilder {
    CommandBuilder::new(
        EDIT_GIVEAWAY,
        "Change the reward or the remaining time of a running giveaway",
        CommandType::ChatInput,
    )
    .default_member_permissions(Permissions::MANAGE_GUILD)
    .option(StringBuilder::new("message_id", "Message id of the giveaway").required(true))
    .option(StringBuilder::new("new_reward", "New reward (optional)"))
    .option(StringBuilder::new("new_duration", "New duration from now, e.g. 2h (optional)"))
}

pub async fn handle(
    ctx: &DiscordContext,
    _interaction: &Interaction,
    cmd: &CommandData,
) -> Result<HandlerReply, Error> {
    let opts = CommandOptions::new(cmd);
    let request = EditRequest {
        message_id: opts.string("message_id").unwrap_or_default().trim().to_string(),
        new_prize: opts.string("new_reward"),
        new_duration: opts.string("new_duration"),
    };

    let outcome = ctx.engine.edit(request).await?;
    let text = match outcome.display_error {
        Some(e) => e.user_message(),
        None => format!("Giveaway {} updated.", outcome.giveaway.message_id),
    };
    Ok(HandlerReply::Ephemeral(text))
}
