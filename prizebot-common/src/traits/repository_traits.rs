use async_trait::async_trait;
use crate::error::Error;
use crate::models::{Giveaway, GiveawayPatch, NewGiveaway, Participant};

/// Durable giveaway rows. Implementations must make `mark_ended` and
/// `update_active` conditional on `status = active` in a single statement,
/// since they are the only protection against a win and an expiry racing.
#[async_trait]
pub trait GiveawayRepository: Send + Sync {
    async fn insert_giveaway(&self, giveaway: &NewGiveaway) -> Result<Giveaway, Error>;

    async fn get_giveaway(&self, message_id: &str) -> Result<Option<Giveaway>, Error>;

    /// Every active guess giveaway; used to rebuild the in-memory game index.
    async fn list_active_guess(&self) -> Result<Vec<Giveaway>, Error>;

    /// Active giveaways whose `end_timestamp <= now_ms`.
    async fn list_expired(&self, now_ms: i64) -> Result<Vec<Giveaway>, Error>;

    /// Applies only the supplied columns. Returns the updated row, or `None`
    /// when the row is missing or no longer active.
    async fn update_active(
        &self,
        message_id: &str,
        patch: &GiveawayPatch,
    ) -> Result<Option<Giveaway>, Error>;

    /// Flips `active -> ended`. Returns `true` only for the caller that made
    /// the transition.
    async fn mark_ended(&self, message_id: &str) -> Result<bool, Error>;
}

#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    /// Fails with `Error::AlreadyJoined` when the (giveaway, user) pair exists.
    async fn insert_participant(&self, participant: &Participant) -> Result<(), Error>;

    async fn count_participants(&self, giveaway_id: &str) -> Result<i64, Error>;

    async fn list_participants(&self, giveaway_id: &str) -> Result<Vec<Participant>, Error>;
}
