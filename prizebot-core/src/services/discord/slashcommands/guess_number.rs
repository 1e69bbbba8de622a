// File: prizebot-core/src/services/discord/slashcommands/guess_number.rs

use twilight_model::application::command::CommandType;
use twilight_model::application::interaction::Interaction;
use twilight_model::application::interaction::application_command::CommandData;
use twilight_model::guild::Permissions;
use twilight_model::http::interaction::{InteractionResponse, InteractionResponseType};
use twilight_util::builder::command::{
    AttachmentBuilder, BooleanBuilder, CommandBuilder, RoleBuilder, StringBuilder,
};

use prizebot_common::error::Error;

use crate::giveaway::GuessRequest;
use crate::services::discord::DiscordContext;
use crate::services::discord::interactions::{HandlerReply, invoking_channel, invoking_user};
use crate::services::discord::secret_modal;
use crate::services::discord::slashcommands::GUESS_NUMBER;
use crate::services::discord::slashcommands::options::CommandOptions;

/// `/guess_number`: thread-based "guess the secret number" giveaway.
pub fn create_guess_number_command() -> CommandBuilder {
    CommandBuilder::new(
        GUESS_NUMBER,
        "Start a \"Guess the Number\" giveaway (Thread Based)",
        CommandType::ChatInput,
    )
    .default_member_permissions(Permissions::MANAGE_GUILD)
    .option(StringBuilder::new("reward", "What will the user win?").required(true))
    .option(StringBuilder::new("duration", "Duration (e.g., 1h, 30m, 2d)").required(true))
    .option(RoleBuilder::new("required_role", "Role required to participate (optional)"))
    .option(AttachmentBuilder::new("image", "An image for the giveaway embed (optional)"))
    .option(BooleanBuilder::new("hints", "React with higher/lower hints on wrong guesses"))
    .option(StringBuilder::new("cooldown", "Time between guesses per user (default 1m, minimum 15s)"))
}

/// Validates and parks the parameters, then asks the organizer for the
/// secret number.
pub async fn handle(
    ctx: &DiscordContext,
    interaction: &Interaction,
    cmd: &CommandData,
) -> Result<HandlerReply, Error> {
    let opts = CommandOptions::new(cmd);
    let request = GuessRequest {
        organizer_id: invoking_user(interaction)?,
        channel_id: invoking_channel(interaction)?,
        guild_id: interaction.guild_id.map(|id| id.to_string()),
        prize: opts.string("reward").unwrap_or_default(),
        duration: opts.string("duration").unwrap_or_default(),
        required_role_id: opts.role_id("required_role"),
        image_url: opts.attachment_url("image"),
        hints: opts.boolean("hints"),
        cooldown: opts.string("cooldown"),
    };
    ctx.engine.begin_guess(request)?;

    let response = InteractionResponse {
        kind: InteractionResponseType::Modal,
        data: Some(secret_modal::modal_data()),
    };
    ctx.http
        .interaction(ctx.application_id)
        .create_response(interaction.id, &interaction.token, &response)
        .await
        .map_err(|e| Error::Platform(format!("Error showing secret number modal: {e}")))?;

    Ok(HandlerReply::Handled)
}
