// File: prizebot-core/src/services/discord/interactions.rs
//
// Routes every `InteractionCreate` to its handler and turns the handler's
// result into one private reply. Rule violations are shown to the user as
// is; anything else is logged and answered with a generic failure.

use tracing::{debug, error, warn};
use twilight_model::application::interaction::{Interaction, InteractionData};
use twilight_model::channel::message::MessageFlags;
use twilight_model::http::interaction::{InteractionResponse, InteractionResponseType};
use twilight_util::builder::InteractionResponseDataBuilder;

use prizebot_common::Error;

use crate::giveaway::JOIN_BUTTON_ID;
use crate::services::discord::DiscordContext;
use crate::services::discord::slashcommands::{
    CLASSIC_GIVEAWAY, EDIT_GIVEAWAY, GUESS_NUMBER, classic_giveaway, edit_giveaway, guess_number,
};
use crate::services::discord::{join_button, secret_modal};

const GENERIC_FAILURE: &str = "Something went wrong while handling that request.";

/// What a handler wants sent back once it is done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerReply {
    /// Private message to the invoking user.
    Ephemeral(String),
    /// The handler already answered the interaction itself (e.g. opened a modal).
    Handled,
}

/// Interactions whose handlers publish messages take longer than Discord's
/// three second window, so they are acknowledged up front.
fn needs_defer(interaction: &Interaction) -> bool {
    match &interaction.data {
        Some(InteractionData::ApplicationCommand(cmd)) => cmd.name == CLASSIC_GIVEAWAY,
        Some(InteractionData::ModalSubmit(modal)) => modal.custom_id == secret_modal::MODAL_ID,
        _ => false,
    }
}

pub async fn handle_interaction_create(ctx: &DiscordContext, interaction: Interaction) {
    let deferred = needs_defer(&interaction);
    if deferred {
        if let Err(e) = defer_ephemeral(ctx, &interaction).await {
            error!("Could not acknowledge interaction {}: {e:?}", interaction.id);
            return;
        }
    }

    let reply = match dispatch(ctx, &interaction).await {
        Ok(reply) => reply,
        Err(e) if e.is_user_facing() => {
            debug!("Interaction {} rejected: {e}", interaction.id);
            HandlerReply::Ephemeral(e.user_message())
        }
        Err(e) => {
            error!("Interaction {} failed: {e:?}", interaction.id);
            HandlerReply::Ephemeral(GENERIC_FAILURE.to_string())
        }
    };

    if let HandlerReply::Ephemeral(text) = reply {
        if let Err(e) = send_ephemeral(ctx, &interaction, deferred, &text).await {
            warn!("Could not answer interaction {}: {e:?}", interaction.id);
        }
    }
}

async fn dispatch(ctx: &DiscordContext, interaction: &Interaction) -> Result<HandlerReply, Error> {
    match &interaction.data {
        Some(InteractionData::ApplicationCommand(cmd)) => match cmd.name.as_str() {
            GUESS_NUMBER => guess_number::handle(ctx, interaction, cmd).await,
            CLASSIC_GIVEAWAY => classic_giveaway::handle(ctx, interaction, cmd).await,
            EDIT_GIVEAWAY => edit_giveaway::handle(ctx, interaction, cmd).await,
            other => Ok(HandlerReply::Ephemeral(format!("Unrecognized command: {other}"))),
        },
        Some(InteractionData::MessageComponent(component)) if component.custom_id == JOIN_BUTTON_ID => {
            join_button::handle(ctx, interaction).await
        }
        Some(InteractionData::ModalSubmit(modal)) if modal.custom_id == secret_modal::MODAL_ID => {
            secret_modal::handle(ctx, interaction, modal).await
        }
        _ => {
            debug!("Ignoring interaction {} of kind {:?}", interaction.id, interaction.kind);
            Ok(HandlerReply::Handled)
        }
    }
}

async fn defer_ephemeral(ctx: &DiscordContext, interaction: &Interaction) -> Result<(), Error> {
    let response = InteractionResponse {
        kind: InteractionResponseType::DeferredChannelMessageWithSource,
        data: Some(
            InteractionResponseDataBuilder::new()
                .flags(MessageFlags::EPHEMERAL)
                .build(),
        ),
    };
    ctx.http
        .interaction(ctx.application_id)
        .create_response(interaction.id, &interaction.token, &response)
        .await
        .map_err(|e| Error::Platform(format!("Error deferring interaction: {e}")))?;
    Ok(())
}

async fn send_ephemeral(
    ctx: &DiscordContext,
    interaction: &Interaction,
    deferred: bool,
    text: &str,
) -> Result<(), Error> {
    let client = ctx.http.interaction(ctx.application_id);
    if deferred {
        client
            .update_response(&interaction.token)
            .content(Some(text))
            .await
            .map_err(|e| Error::Platform(format!("Error editing deferred reply: {e}")))?;
        return Ok(());
    }

    let response = InteractionResponse {
        kind: InteractionResponseType::ChannelMessageWithSource,
        data: Some(
            InteractionResponseDataBuilder::new()
                .content(text)
                .flags(MessageFlags::EPHEMERAL)
                .build(),
        ),
    };
    client
        .create_response(interaction.id, &interaction.token, &response)
        .await
        .map_err(|e| Error::Platform(format!("Error replying to interaction: {e}")))?;
    Ok(())
}

/// Role ids of the invoking member; empty outside guilds.
pub fn member_roles(interaction: &Interaction) -> Vec<String> {
    interaction
        .member
        .as_ref()
        .map(|m| m.roles.iter().map(|r| r.to_string()).collect())
        .unwrap_or_default()
}

pub fn invoking_user(interaction: &Interaction) -> Result<String, Error> {
    interaction
        .author_id()
        .map(|id| id.to_string())
        .ok_or_else(|| Error::Platform("Interaction has no author".into()))
}

pub fn invoking_channel(interaction: &Interaction) -> Result<String, Error> {
    interaction
        .channel
        .as_ref()
        .map(|c| c.id.to_string())
        .ok_or_else(|| Error::Platform("Interaction has no channel".into()))
}
