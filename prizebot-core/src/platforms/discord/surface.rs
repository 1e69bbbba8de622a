// File: prizebot-core/src/platforms/discord/surface.rs
//
// `GiveawaySurface` on top of the twilight HTTP client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};
use twilight_http::Client as HttpClient;
use twilight_http::request::channel::reaction::RequestReactionType;
use twilight_model::channel::message::component::{ActionRow, Button, ButtonStyle, Component};
use twilight_model::channel::message::embed::Embed;
use twilight_model::channel::thread::AutoArchiveDuration;
use twilight_model::id::Id;
use twilight_model::util::Timestamp;
use twilight_util::builder::embed::{EmbedBuilder, EmbedFooterBuilder, ImageSource};

use prizebot_common::Error;

use crate::giveaway::surface::{GiveawayCard, GiveawaySurface, Reaction, JOIN_BUTTON_ID};

/// Parses a snowflake stored as text.
pub fn parse_id<T>(raw: &str) -> Result<Id<T>, Error> {
    raw.parse::<u64>()
        .ok()
        .and_then(Id::new_checked)
        .ok_or_else(|| Error::Platform(format!("Invalid Discord id: {raw}")))
}

fn build_embed(card: &GiveawayCard) -> Result<Embed, Error> {
    let mut builder = EmbedBuilder::new()
        .title(card.title.clone())
        .description(card.description.clone())
        .color(card.color);

    if let Some(url) = &card.image_url {
        match ImageSource::url(url.clone()) {
            Ok(src) => builder = builder.image(src),
            Err(e) => warn!("Dropping invalid giveaway image url {url}: {e}"),
        }
    }
    if let Some(footer) = &card.footer {
        builder = builder.footer(EmbedFooterBuilder::new(footer.clone()));
    }
    if let Some(ms) = card.timestamp_ms {
        let ts = Timestamp::from_micros(ms.saturating_mul(1000))
            .map_err(|e| Error::Platform(format!("Invalid embed timestamp {ms}: {e}")))?;
        builder = builder.timestamp(ts);
    }

    builder
        .validate()
        .map(EmbedBuilder::build)
        .map_err(|e| Error::Platform(format!("Invalid giveaway embed: {e}")))
}

fn build_components(card: &GiveawayCard) -> Vec<Component> {
    if !card.join_button {
        return Vec::new();
    }
    vec![Component::ActionRow(ActionRow {
        components: vec![Component::Button(Button {
            custom_id: Some(JOIN_BUTTON_ID.to_string()),
            disabled: false,
            emoji: None,
            label: Some("🎉 Join Giveaway".to_string()),
            style: ButtonStyle::Primary,
            url: None,
            sku_id: None,
        })],
    })]
}

#[derive(Clone)]
pub struct DiscordSurface {
    http: Arc<HttpClient>,
}

impl DiscordSurface {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl GiveawaySurface for DiscordSurface {
    async fn publish(&self, channel_id: &str, card: &GiveawayCard) -> Result<String, Error> {
        let channel = parse_id(channel_id)?;
        let embeds = [build_embed(card)?];
        let components = build_components(card);

        let msg = self
            .http
            .create_message(channel)
            .embeds(&embeds)
            .components(&components)
            .await
            .map_err(|e| Error::Platform(format!("Error publishing giveaway card: {e}")))?
            .model()
            .await
            .map_err(|e| Error::Platform(format!("Error reading published card: {e}")))?;

        debug!("Published giveaway card {} in {channel_id}", msg.id);
        Ok(msg.id.to_string())
    }

    async fn update(&self, channel_id: &str, message_id: &str, card: &GiveawayCard) -> Result<(), Error> {
        let embeds = [build_embed(card)?];
        let components = build_components(card);

        self.http
            .update_message(parse_id(channel_id)?, parse_id(message_id)?)
            .embeds(Some(embeds.as_slice()))
            .components(Some(components.as_slice()))
            .await
            .map_err(|e| Error::Platform(format!("Error updating giveaway card {message_id}: {e}")))?;
        Ok(())
    }

    async fn delete(&self, channel_id: &str, message_id: &str) -> Result<(), Error> {
        self.http
            .delete_message(parse_id(channel_id)?, parse_id(message_id)?)
            .await
            .map_err(|e| Error::Platform(format!("Error deleting message {message_id}: {e}")))?;
        Ok(())
    }

    async fn open_thread(&self, channel_id: &str, message_id: &str, name: &str) -> Result<String, Error> {
        let thread = self
            .http
            .create_thread_from_message(parse_id(channel_id)?, parse_id(message_id)?, name)
            .auto_archive_duration(AutoArchiveDuration::Day)
            .await
            .map_err(|e| Error::Platform(format!("Error opening thread on {message_id}: {e}")))?
            .model()
            .await
            .map_err(|e| Error::Platform(format!("Error reading new thread: {e}")))?;
        Ok(thread.id.to_string())
    }

    async fn post(&self, channel_id: &str, content: &str) -> Result<String, Error> {
        let msg = self
            .http
            .create_message(parse_id(channel_id)?)
            .content(content)
            .await
            .map_err(|e| Error::Platform(format!("Error sending Discord message: {e}")))?
            .model()
            .await
            .map_err(|e| Error::Platform(format!("Error reading sent message: {e}")))?;
        Ok(msg.id.to_string())
    }

    async fn archive_thread(&self, thread_id: &str) -> Result<(), Error> {
        self.http
            .update_thread(parse_id(thread_id)?)
            .archived(true)
            .await
            .map_err(|e| Error::Platform(format!("Error archiving thread {thread_id}: {e}")))?;
        Ok(())
    }

    async fn react(&self, channel_id: &str, message_id: &str, reaction: Reaction) -> Result<(), Error> {
        let emoji = RequestReactionType::Unicode { name: reaction.emoji() };
        self.http
            .create_reaction(parse_id(channel_id)?, parse_id(message_id)?, &emoji)
            .await
            .map_err(|e| Error::Platform(format!("Error reacting to {message_id}: {e}")))?;
        Ok(())
    }

    async fn reply_transient(
        &self,
        channel_id: &str,
        message_id: &str,
        content: &str,
        ttl: Duration,
    ) -> Result<(), Error> {
        let channel = parse_id(channel_id)?;
        let reply = self
            .http
            .create_message(channel)
            .content(content)
            .reply(parse_id(message_id)?)
            .await
            .map_err(|e| Error::Platform(format!("Error replying to {message_id}: {e}")))?
            .model()
            .await
            .map_err(|e| Error::Platform(format!("Error reading reply: {e}")))?;

        let http = self.http.clone();
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Err(e) = http.delete_message(channel, reply.id).await {
                debug!("Transient reply {} already gone: {e}", reply.id);
            }
        });
        Ok(())
    }
}
