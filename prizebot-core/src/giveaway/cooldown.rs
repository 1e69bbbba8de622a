// File: prizebot-core/src/giveaway/cooldown.rs

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// Per (game thread, user) rate limiting for guesses. Advisory only and never
/// persisted; losing it on restart just lets a few extra guesses through.
#[derive(Debug, Default)]
pub struct CooldownTracker {
    last_guess: DashMap<(String, String), CooldownEntry>,
}

#[derive(Debug, Clone, Copy)]
struct CooldownEntry {
    at_ms: i64,
    cooldown_ms: i64,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self { last_guess: DashMap::new() }
    }

    /// Records a guess at `now_ms` unless the user is still cooling down.
    /// Returns `true` when the guess may be evaluated. Check and record happen
    /// under the same entry lock.
    pub fn try_acquire(&self, game: &str, user_id: &str, now_ms: i64, cooldown_ms: i64) -> bool {
        match self.last_guess.entry((game.to_string(), user_id.to_string())) {
            Entry::Occupied(mut occupied) => {
                let prev = *occupied.get();
                if now_ms - prev.at_ms < prev.cooldown_ms {
                    false
                } else {
                    occupied.insert(CooldownEntry { at_ms: now_ms, cooldown_ms });
                    true
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(CooldownEntry { at_ms: now_ms, cooldown_ms });
                true
            }
        }
    }

    pub fn is_cooling_down(&self, game: &str, user_id: &str, now_ms: i64) -> bool {
        self.last_guess
            .get(&(game.to_string(), user_id.to_string()))
            .map(|e| now_ms - e.at_ms < e.cooldown_ms)
            .unwrap_or(false)
    }

    /// Drops entries older than `retention_ms` whose cooldown has also run out.
    /// Returns how many were removed.
    pub fn sweep(&self, now_ms: i64, retention_ms: i64) -> usize {
        let before = self.last_guess.len();
        self.last_guess.retain(|_, e| {
            let age = now_ms - e.at_ms;
            age < retention_ms || age < e.cooldown_ms
        });
        before.saturating_sub(self.last_guess.len())
    }

    /// Forgets every entry of one game, e.g. once it has been resolved.
    pub fn forget_game(&self, game: &str) {
        self.last_guess.retain(|(g, _), _| g != game);
    }

    pub fn len(&self) -> usize {
        self.last_guess.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_guess.is_empty()
    }
}
