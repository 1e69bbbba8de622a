// File: prizebot-core/src/services/discord/slashcommands/mod.rs

pub mod classic_giveaway;
pub mod edit_giveaway;
pub mod guess_number;
pub mod options;

use std::sync::Arc;

use tracing::info;
use twilight_http::Client as HttpClient;
use twilight_model::application::command::Command;
use twilight_model::id::Id;
use twilight_model::id::marker::ApplicationMarker;

use prizebot_common::error::Error;

pub const GUESS_NUMBER: &str = "guess_number";
pub const CLASSIC_GIVEAWAY: &str = "classic_giveaway";
pub const EDIT_GIVEAWAY: &str = "edit_giveaway";

pub fn all_commands() -> Vec<Command> {
    vec![
        guess_number::create_guess_number_command().build(),
        classic_giveaway::create_classic_giveaway_command().build(),
        edit_giveaway::create_edit_giveaway_command().build(),
    ]
}

pub async fn register_global_slash_commands(
    http: &Arc<HttpClient>,
    application_id: Id<ApplicationMarker>,
) -> Result<(), Error> {
    let commands = all_commands();

    http.interaction(application_id)
        .set_global_commands(&commands)
        .await
        .map_err(|e| Error::Platform(format!("Failed to register global slash commands: {e}")))?;

    info!("Registered {} global slash commands.", commands.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_names_are_unique_and_known() {
        let names: Vec<String> = all_commands().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec![GUESS_NUMBER, CLASSIC_GIVEAWAY, EDIT_GIVEAWAY]);
    }

    #[test]
    fn test_required_options_come_first() {
        for cmd in all_commands() {
            let first_optional = cmd.options.iter().position(|o| o.required != Some(true));
            if let Some(idx) = first_optional {
                assert!(
                    cmd.options[idx..].iter().all(|o| o.required != Some(true)),
                    "{} lists a required option after an optional one",
                    cmd.name
                );
            }
        }
    }
}
