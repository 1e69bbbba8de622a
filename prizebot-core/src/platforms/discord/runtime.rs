// File: prizebot-core/src/platforms/discord/runtime.rs

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{error, info, trace, warn};
use twilight_gateway::{
    self as gateway, CloseFrame, Config, Event, EventTypeFlags, Intents, MessageSender, Shard,
    StreamExt,
};
use twilight_http::Client as HttpClient;
use twilight_http::client::ClientBuilder;
use twilight_model::id::Id;
use twilight_model::id::marker::ApplicationMarker;

use crate::Error;
use crate::giveaway::GiveawayEngine;
use crate::platforms::{ConnectionStatus, PlatformIntegration};
use crate::services::discord::DiscordContext;
use crate::services::discord::guesses::handle_message_create;
use crate::services::discord::interactions::handle_interaction_create;

pub const INTENTS: Intents = Intents::GUILDS
    .union(Intents::GUILD_MESSAGES)
    .union(Intents::MESSAGE_CONTENT);

fn wanted_events() -> EventTypeFlags {
    EventTypeFlags::READY | EventTypeFlags::INTERACTION_CREATE | EventTypeFlags::MESSAGE_CREATE
}

/// Reads one shard's events and hands interactions and messages off to
/// their own tasks so a slow handler never stalls the shard.
async fn shard_runner(mut shard: Shard, ctx: DiscordContext) {
    let shard_id = shard.id().number();
    info!("(ShardRunner) Shard {shard_id} started. Listening for events.");

    while let Some(item) = shard.next_event(wanted_events()).await {
        match item {
            Ok(Event::Ready(ready)) => {
                info!(
                    "Shard {shard_id} => READY as {} (ID={}), {} guilds",
                    ready.user.name,
                    ready.user.id,
                    ready.guilds.len()
                );
            }
            Ok(Event::InteractionCreate(ic)) => {
                let ctx = ctx.clone();
                let interaction = ic.0;
                tokio::spawn(async move {
                    handle_interaction_create(&ctx, interaction).await;
                });
            }
            Ok(Event::MessageCreate(mc)) => {
                if mc.author.bot {
                    continue;
                }
                let ctx = ctx.clone();
                let msg = mc.0;
                tokio::spawn(async move {
                    handle_message_create(&ctx, &msg).await;
                });
            }
            Ok(other) => {
                trace!("Shard {shard_id} => unhandled event: {:?}", other.kind());
            }
            Err(err) => {
                error!("Shard {shard_id} => error receiving event: {err:?}");
            }
        }
    }

    warn!("(ShardRunner) Shard {shard_id} event loop ended.");
}

pub struct DiscordPlatform {
    token: String,
    application_id: Id<ApplicationMarker>,
    connection_status: ConnectionStatus,
    http: Arc<HttpClient>,
    engine: Option<Arc<GiveawayEngine>>,
    shard_tasks: Vec<JoinHandle<()>>,
    shard_senders: Vec<MessageSender>,
}

impl DiscordPlatform {
    pub fn new(token: String, application_id: Id<ApplicationMarker>) -> Self {
        let http = Arc::new(
            ClientBuilder::new()
                .token(token.clone())
                .timeout(Duration::from_secs(30))
                .build(),
        );
        Self {
            token,
            application_id,
            connection_status: ConnectionStatus::Disconnected,
            http,
            engine: None,
            shard_tasks: Vec::new(),
            shard_senders: Vec::new(),
        }
    }

    pub fn http(&self) -> Arc<HttpClient> {
        self.http.clone()
    }

    /// Must be called before `connect`.
    pub fn attach_engine(&mut self, engine: Arc<GiveawayEngine>) {
        self.engine = Some(engine);
    }

    /// Resolves once every shard has stopped.
    pub async fn wait(&mut self) {
        for task in self.shard_tasks.drain(..) {
            if let Err(e) = task.await {
                error!("Shard task panicked: {e:?}");
            }
        }
        self.shard_senders.clear();
        self.connection_status = ConnectionStatus::Disconnected;
    }
}

#[async_trait]
impl PlatformIntegration for DiscordPlatform {
    async fn connect(&mut self) -> Result<(), Error> {
        if self.connection_status == ConnectionStatus::Connected {
            info!("(DiscordPlatform) Already connected => skipping");
            return Ok(());
        }
        if self.token.is_empty() {
            return Err(Error::Platform("Discord token is empty".into()));
        }
        let engine = self
            .engine
            .clone()
            .ok_or_else(|| Error::Platform("No giveaway engine attached".into()))?;

        let ctx = DiscordContext {
            http: self.http.clone(),
            application_id: self.application_id,
            engine,
        };

        let config = Config::new(self.token.clone(), INTENTS);
        let shards = gateway::create_recommended(&self.http, config, |_, b| b.build())
            .await
            .map_err(|e| Error::Platform(format!("create_recommended error: {e}")))?;

        for shard in shards {
            self.shard_senders.push(shard.sender());
            let ctx = ctx.clone();
            self.shard_tasks.push(tokio::spawn(shard_runner(shard, ctx)));
        }
        info!("(DiscordPlatform) Started {} shard(s).", self.shard_tasks.len());

        self.connection_status = ConnectionStatus::Connected;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), Error> {
        for sender in &self.shard_senders {
            let _ = sender.close(CloseFrame::NORMAL);
        }
        self.wait().await;
        Ok(())
    }
}
