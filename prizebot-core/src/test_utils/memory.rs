// File: prizebot-core/src/test_utils/memory.rs
//
// In-memory store with the same conditional semantics as the Postgres
// repositories, for engine tests that do not need a database.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use prizebot_common::Error;
use prizebot_common::models::{Giveaway, GiveawayKind, GiveawayPatch, GiveawayStatus, NewGiveaway, Participant};
use prizebot_common::traits::repository_traits::{GiveawayRepository, ParticipantRepository};

#[derive(Default)]
pub struct InMemoryGiveawayStore {
    giveaways: Mutex<HashMap<String, Giveaway>>,
    participants: Mutex<Vec<Participant>>,
    fail_inserts: AtomicBool,
    fail_participant_reads: AtomicBool,
}

impl InMemoryGiveawayStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `insert_giveaway` fail.
    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    /// Makes `count_participants` and `list_participants` fail.
    pub fn fail_participant_reads(&self, fail: bool) {
        self.fail_participant_reads.store(fail, Ordering::SeqCst);
    }

    /// Puts a row in place directly, bypassing `insert_giveaway`.
    pub fn seed(&self, giveaway: Giveaway) {
        self.giveaways
            .lock()
            .unwrap()
            .insert(giveaway.message_id.clone(), giveaway);
    }

    pub fn snapshot(&self, message_id: &str) -> Option<Giveaway> {
        self.giveaways.lock().unwrap().get(message_id).cloned()
    }

    pub fn giveaway_count(&self) -> usize {
        self.giveaways.lock().unwrap().len()
    }

    fn participant_read_guard(&self) -> Result<(), Error> {
        if self.fail_participant_reads.load(Ordering::SeqCst) {
            return Err(Error::Platform("participant store unavailable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl GiveawayRepository for InMemoryGiveawayStore {
    async fn insert_giveaway(&self, giveaway: &NewGiveaway) -> Result<Giveaway, Error> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(Error::Platform("store unavailable".into()));
        }
        let mut map = self.giveaways.lock().unwrap();
        if map.contains_key(&giveaway.message_id) {
            return Err(Error::Parse(format!("duplicate giveaway {}", giveaway.message_id)));
        }
        let row = giveaway.to_giveaway(Utc::now());
        map.insert(row.message_id.clone(), row.clone());
        Ok(row)
    }

    async fn get_giveaway(&self, message_id: &str) -> Result<Option<Giveaway>, Error> {
        Ok(self.snapshot(message_id))
    }

    async fn list_active_guess(&self) -> Result<Vec<Giveaway>, Error> {
        let map = self.giveaways.lock().unwrap();
        Ok(map
            .values()
            .filter(|g| g.is_active() && g.kind == GiveawayKind::Guess)
            .cloned()
            .collect())
    }

    async fn list_expired(&self, now_ms: i64) -> Result<Vec<Giveaway>, Error> {
        let map = self.giveaways.lock().unwrap();
        let mut out: Vec<Giveaway> = map
            .values()
            .filter(|g| g.is_active() && g.end_timestamp <= now_ms)
            .cloned()
            .collect();
        out.sort_by_key(|g| g.end_timestamp);
        Ok(out)
    }

    async fn update_active(
        &self,
        message_id: &str,
        patch: &GiveawayPatch,
    ) -> Result<Option<Giveaway>, Error> {
        if patch.is_empty() {
            return Err(Error::NothingToUpdate);
        }
        let mut map = self.giveaways.lock().unwrap();
        let Some(row) = map.get_mut(message_id).filter(|g| g.is_active()) else {
            return Ok(None);
        };
        if let Some(prize) = &patch.prize {
            row.prize = prize.clone();
        }
        if let Some(end) = patch.end_timestamp {
            row.end_timestamp = end;
        }
        Ok(Some(row.clone()))
    }

    async fn mark_ended(&self, message_id: &str) -> Result<bool, Error> {
        let mut map = self.giveaways.lock().unwrap();
        match map.get_mut(message_id) {
            Some(row) if row.is_active() => {
                row.status = GiveawayStatus::Ended;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl ParticipantRepository for InMemoryGiveawayStore {
    async fn insert_participant(&self, participant: &Participant) -> Result<(), Error> {
        let mut list = self.participants.lock().unwrap();
        if list
            .iter()
            .any(|p| p.giveaway_id == participant.giveaway_id && p.user_id == participant.user_id)
        {
            return Err(Error::AlreadyJoined);
        }
        list.push(participant.clone());
        Ok(())
    }

    async fn count_participants(&self, giveaway_id: &str) -> Result<i64, Error> {
        self.participant_read_guard()?;
        let list = self.participants.lock().unwrap();
        Ok(list.iter().filter(|p| p.giveaway_id == giveaway_id).count() as i64)
    }

    async fn list_participants(&self, giveaway_id: &str) -> Result<Vec<Participant>, Error> {
        self.participant_read_guard()?;
        let list = self.participants.lock().unwrap();
        Ok(list
            .iter()
            .filter(|p| p.giveaway_id == giveaway_id)
            .cloned()
            .collect())
    }
}
