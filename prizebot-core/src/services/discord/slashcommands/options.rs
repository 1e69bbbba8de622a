// File: prizebot-core/src/services/discord/slashcommands/options.rs

use twilight_model::application::interaction::application_command::{CommandData, CommandOptionValue};

/// Typed lookups into the options of a chat-input command.
pub struct CommandOptions<'a> {
    data: &'a CommandData,
}

impl<'a> CommandOptions<'a> {
    pub fn new(data: &'a CommandData) -> Self {
        Self { data }
    }

    fn value(&self, name: &str) -> Option<&'a CommandOptionValue> {
        self.data
            .options
            .iter()
            .find(|o| o.name == name)
            .map(|o| &o.value)
    }

    pub fn string(&self, name: &str) -> Option<String> {
        match self.value(name)? {
            CommandOptionValue::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.value(name)? {
            CommandOptionValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.value(name)? {
            CommandOptionValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn role_id(&self, name: &str) -> Option<String> {
        match self.value(name)? {
            CommandOptionValue::Role(id) => Some(id.to_string()),
            _ => None,
        }
    }

    /// CDN url of an attachment option, taken from the resolved data.
    pub fn attachment_url(&self, name: &str) -> Option<String> {
        let CommandOptionValue::Attachment(id) = self.value(name)? else {
            return None;
        };
        self.data
            .resolved
            .as_ref()?
            .attachments
            .get(id)
            .map(|a| a.url.clone())
    }
}
