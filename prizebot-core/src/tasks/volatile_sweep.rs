// File: prizebot-core/src/tasks/volatile_sweep.rs

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;

use crate::giveaway::GiveawayEngine;

/// Spawns a background task that periodically drops stale cooldown entries
/// and abandoned `/guess_number` prompts.
pub fn spawn_volatile_sweep_task(
    engine: Arc<GiveawayEngine>,
    every: Duration,
    cooldown_retention: Duration,
    pending_ttl: Duration,
) -> JoinHandle<()> {
    let retention_ms = cooldown_retention.as_millis() as i64;
    let pending_ttl_ms = pending_ttl.as_millis() as i64;
    tokio::spawn(async move {
        loop {
            sleep(every).await;
            let (cooldowns, pending) = engine.sweep_volatile(retention_ms, pending_ttl_ms);
            if cooldowns + pending > 0 {
                debug!("Swept {cooldowns} cooldown entries and {pending} pending prompts");
            }
        }
    })
}
