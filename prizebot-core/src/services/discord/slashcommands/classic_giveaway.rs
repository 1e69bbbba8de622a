// File: prizebot-core/src/services/discord/slashcommands/classic_giveaway.rs

use twilight_model::application::command::CommandType;
use twilight_model::application::interaction::Interaction;
use twilight_model::application::interaction::application_command::CommandData;
use twilight_model::guild::Permissions;
use twilight_util::builder::command::{
    AttachmentBuilder, CommandBuilder, IntegerBuilder, RoleBuilder, StringBuilder,
};

use prizebot_common::error::Error;

use crate::giveaway::ClassicRequest;
use crate::services::discord::DiscordContext;
use crate::services::discord::interactions::{HandlerReply, invoking_channel, invoking_user};
use crate::services::discord::slashcommands::CLASSIC_GIVEAWAY;
use crate::services::discord::slashcommands::options::CommandOptions;

/// `/classic_giveaway`: button-entry giveaway with a random draw.
pub fn create_classic_giveaway_command() -> CommandBuilder {
    CommandBuilder::new(
        CLASSIC_GIVEAWAY,
        "Start a standard button-based giveaway",
        CommandType::ChatInput,
    )
    .default_member_permissions(Permissions::MANAGE_GUILD)
    .option(StringBuilder::new("reward", "What will the user win?").required(true))
    .option(StringBuilder::new("duration", "Duration (e.g., 1h, 30m, 2d)").required(true))
    .option(IntegerBuilder::new("winners", "How many winners?").required(true))
    .option(RoleBuilder::new("required_role", "Role required to participate (optional)"))
    .option(AttachmentBuilder::new("image", "An image for the giveaway embed (optional)"))
}

pub async fn handle(
    ctx: &DiscordContext,
    interaction: &Interaction,
    cmd: &CommandData,
) -> Result<HandlerReply, Error> {
    let opts = CommandOptions::new(cmd);
    let request = ClassicRequest {
        organizer_id: invoking_user(interaction)?,
        channel_id: invoking_channel(interaction)?,
        guild_id: interaction.guild_id.map(|id| id.to_string()),
        prize: opts.string("reward").unwrap_or_default(),
        duration: opts.string("duration").unwrap_or_default(),
        winner_count: opts.integer("winners").unwrap_or(1),
        required_role_id: opts.role_id("required_role"),
        image_url: opts.attachment_url("image"),
    };

    let giveaway = ctx.engine.create_classic(request).await?;
    Ok(HandlerReply::Ephemeral(format!(
        "Giveaway started! (message {})",
        giveaway.message_id
    )))
}
