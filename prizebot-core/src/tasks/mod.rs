// File: prizebot-core/src/tasks/mod.rs

pub mod expiry;
pub mod volatile_sweep;

use std::time::Duration;

/// How often the background tasks run and how long volatile entries live.
#[derive(Debug, Clone)]
pub struct TaskIntervals {
    pub expiry_poll: Duration,
    pub sweep_every: Duration,
    pub cooldown_retention: Duration,
    pub pending_ttl: Duration,
}

impl Default for TaskIntervals {
    fn default() -> Self {
        Self {
            expiry_poll: Duration::from_secs(10),
            sweep_every: Duration::from_secs(600),
            cooldown_retention: Duration::from_secs(3600),
            pending_ttl: Duration::from_secs(15 * 60),
        }
    }
}
