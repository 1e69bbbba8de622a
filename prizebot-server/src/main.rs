// File: prizebot-server/src/main.rs

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use prizebot_core::Database;
use prizebot_core::giveaway::duration::parse_duration;
use prizebot_core::giveaway::{GiveawayEngine, GiveawayPolicy, RateLimitFeedback};
use prizebot_core::platforms::PlatformIntegration;
use prizebot_core::platforms::discord::surface::parse_id;
use prizebot_core::platforms::discord::{DiscordPlatform, DiscordSurface};
use prizebot_core::repositories::{PostgresGiveawayRepository, PostgresParticipantRepository};
use prizebot_core::services::discord::slashcommands::register_global_slash_commands;
use prizebot_core::tasks::TaskIntervals;
use prizebot_core::tasks::expiry::spawn_expiry_task;
use prizebot_core::tasks::volatile_sweep::spawn_volatile_sweep_task;
use prizebot_core::utils::time::SystemClock;

#[derive(Parser, Debug, Clone)]
#[command(name = "prizebot")]
#[command(author, version, about = "Prizebot - Discord giveaways: classic draws and guess-the-number games")]
struct Args {
    /// Bot token.
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    discord_token: String,

    /// Application id used to register slash commands and answer interactions.
    #[arg(long, env = "DISCORD_APPLICATION_ID")]
    application_id: String,

    /// Postgres connection URL.
    #[arg(long, env = "DATABASE_URL", default_value = "postgres://prizebot@localhost:5432/prizebot")]
    database_url: String,

    /// Seconds between expiry polls.
    #[arg(long, default_value_t = 10)]
    expiry_poll_secs: u64,

    /// Shortest accepted giveaway duration.
    #[arg(long, default_value = "3m")]
    min_duration: String,

    /// Longest accepted giveaway duration.
    #[arg(long, default_value = "365d")]
    max_duration: String,

    /// Seconds between sweeps of cooldown entries and abandoned prompts.
    #[arg(long, default_value_t = 600)]
    cooldown_sweep_secs: u64,

    /// How long a cooldown entry is kept after its window closed.
    #[arg(long, default_value = "1h")]
    cooldown_retention: String,

    /// How long an unanswered secret-number prompt is kept.
    #[arg(long, default_value = "15m")]
    pending_ttl: String,

    /// How a guesser on cooldown is told to wait.
    #[arg(long, value_enum, default_value_t = RateLimitFeedback::Reaction)]
    rate_limit_feedback: RateLimitFeedback,

    /// Do not (re)register global slash commands at startup.
    #[arg(long, default_value = "false")]
    skip_command_registration: bool,
}

fn init_tracing() {
    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("log bridge already installed: {e}");
    }
    let filter = EnvFilter::from_default_env()
        .add_directive("prizebot=info".parse().unwrap_or_default())
        .add_directive("prizebot_core=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(sub)
        .expect("Failed to set global subscriber");
}

fn duration_arg(name: &str, raw: &str) -> anyhow::Result<Duration> {
    let ms = parse_duration(raw).with_context(|| format!("invalid --{name}"))?;
    Ok(Duration::from_millis(ms as u64))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();
    let args = Args::parse();

    let min_duration = duration_arg("min-duration", &args.min_duration)?;
    let max_duration = duration_arg("max-duration", &args.max_duration)?;
    anyhow::ensure!(max_duration >= min_duration, "--max-duration is shorter than --min-duration");
    let intervals = TaskIntervals {
        expiry_poll: Duration::from_secs(args.expiry_poll_secs.max(1)),
        sweep_every: Duration::from_secs(args.cooldown_sweep_secs.max(1)),
        cooldown_retention: duration_arg("cooldown-retention", &args.cooldown_retention)?,
        pending_ttl: duration_arg("pending-ttl", &args.pending_ttl)?,
    };
    let policy = GiveawayPolicy {
        min_duration_ms: min_duration.as_millis() as i64,
        max_duration_ms: i64::try_from(max_duration.as_millis()).unwrap_or(i64::MAX),
        rate_limit_feedback: args.rate_limit_feedback,
        ..GiveawayPolicy::default()
    };
    info!("Prizebot starting. policy={policy:?}, intervals={intervals:?}");

    let db = Database::new(&args.database_url)
        .await
        .context("connecting to Postgres")?;
    db.migrate().await.context("applying migrations")?;

    let application_id = parse_id(&args.application_id).context("invalid --application-id")?;
    let mut discord = DiscordPlatform::new(args.discord_token.clone(), application_id);
    let http = discord.http();

    let engine = Arc::new(GiveawayEngine::new(
        Arc::new(PostgresGiveawayRepository::new(db.pool().clone())),
        Arc::new(PostgresParticipantRepository::new(db.pool().clone())),
        Arc::new(DiscordSurface::new(http.clone())),
        Arc::new(SystemClock),
        policy,
    ));
    engine.rebuild_index().await.context("rebuilding the guess game index")?;

    if args.skip_command_registration {
        info!("Skipping slash command registration.");
    } else if let Err(e) = register_global_slash_commands(&http, application_id).await {
        warn!("Slash command registration failed, continuing with existing commands: {e}");
    }

    let expiry = spawn_expiry_task(engine.clone(), intervals.expiry_poll);
    let sweep = spawn_volatile_sweep_task(
        engine.clone(),
        intervals.sweep_every,
        intervals.cooldown_retention,
        intervals.pending_ttl,
    );

    discord.attach_engine(engine);
    discord.connect().await.context("connecting to the Discord gateway")?;

    tokio::select! {
        _ = discord.wait() => {
            error!("All shards stopped; shutting down.");
        }
        res = tokio::signal::ctrl_c() => {
            if let Err(e) = res {
                error!("Failed to listen for ctrl-c: {e}");
            }
            info!("Shutdown requested.");
        }
    }

    if let Err(e) = discord.disconnect().await {
        warn!("Error while closing shards: {e}");
    }
    expiry.abort();
    sweep.abort();
    info!("Main finished. Goodbye!");
    Ok(())
}
