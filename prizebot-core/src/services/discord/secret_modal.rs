// File: prizebot-core/src/services/discord/secret_modal.rs
//
// Second step of `/guess_number`: the organizer types the secret number into
// a modal, which keeps it out of the channel.

use twilight_model::application::interaction::Interaction;
use twilight_model::application::interaction::modal::ModalInteractionData;
use twilight_model::channel::message::component::{ActionRow, Component, TextInput, TextInputStyle};
use twilight_model::http::interaction::InteractionResponseData;
use twilight_util::builder::InteractionResponseDataBuilder;

use prizebot_common::error::Error;

use crate::services::discord::DiscordContext;
use crate::services::discord::interactions::{HandlerReply, invoking_user};

pub const MODAL_ID: &str = "modal_guess_secret";
pub const SECRET_INPUT_ID: &str = "secret_number";

pub fn modal_data() -> InteractionResponseData {
    let input = TextInput {
        custom_id: SECRET_INPUT_ID.to_string(),
        label: "Winning Number".to_string(),
        max_length: Some(20),
        min_length: Some(1),
        placeholder: Some("e.g. 42".to_string()),
        required: Some(true),
        style: TextInputStyle::Short,
        value: None,
    };
    InteractionResponseDataBuilder::new()
        .custom_id(MODAL_ID)
        .title("Set Secret Number")
        .components([Component::ActionRow(ActionRow {
            components: vec![Component::TextInput(input)],
        })])
        .build()
}

fn secret_value(modal: &ModalInteractionData) -> Option<&str> {
    modal
        .components
        .iter()
        .flat_map(|row| row.components.iter())
        .find(|c| c.custom_id == SECRET_INPUT_ID)
        .and_then(|c| c.value.as_deref())
}

pub async fn handle(
    ctx: &DiscordContext,
    interaction: &Interaction,
    modal: &ModalInteractionData,
) -> Result<HandlerReply, Error> {
    let organizer_id = invoking_user(interaction)?;
    let raw = secret_value(modal).unwrap_or_default();

    let text = match ctx.engine.complete_guess(&organizer_id, raw).await? {
        Some(giveaway) => format!(
            "Guess the Number giveaway started! Guesses go in <#{}>.",
            giveaway.thread_id.as_deref().unwrap_or(&giveaway.channel_id)
        ),
        None => "There is no giveaway waiting for a number. Run /guess_number again.".to_string(),
    };
    Ok(HandlerReply::Ephemeral(text))
}
