// File: prizebot-core/src/tasks/expiry.rs

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error};

use crate::giveaway::{GiveawayEngine, Resolution};

/// One poll: resolve everything that is due. Never fails; a store error for
/// the whole listing is logged and retried on the next tick.
pub async fn run_expiry_pass(engine: &GiveawayEngine) -> Vec<Resolution> {
    match engine.resolve_expired().await {
        Ok(resolutions) => {
            if !resolutions.is_empty() {
                debug!("Expiry pass resolved {} giveaway(s)", resolutions.len());
            }
            resolutions
        }
        Err(e) => {
            error!("Expiry pass failed to list due giveaways: {e:?}");
            Vec::new()
        }
    }
}

/// Spawns the periodic expiry poll. Passes never overlap: the next tick is
/// only awaited once the previous pass finished.
pub fn spawn_expiry_task(engine: Arc<GiveawayEngine>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            run_expiry_pass(&engine).await;
        }
    })
}
