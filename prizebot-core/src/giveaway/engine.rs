// File: prizebot-core/src/giveaway/engine.rs
//
// The giveaway lifecycle engine: creation, edit, participation, guess
// evaluation and resolution. It owns the in-memory game index, the cooldown
// tracker and the pending guess creations, reads/writes the store through the
// repository traits and reaches the chat platform only via `GiveawaySurface`.
//
// Store writes always happen before display writes. Display failures after a
// committed store write are logged (or reported as `DisplaySync`) and never
// rolled back.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, error, info, warn};

use prizebot_common::Error;
use prizebot_common::models::{
    Giveaway, GiveawayKind, GiveawayPatch, NewGiveaway, Participant, TypeData,
    DEFAULT_COOLDOWN_MS, MAX_PRIZE_CHARS, MIN_COOLDOWN_MS,
};
use prizebot_common::traits::repository_traits::{GiveawayRepository, ParticipantRepository};

use crate::giveaway::cooldown::CooldownTracker;
use crate::giveaway::draw::draw_winners;
use crate::giveaway::duration::parse_duration;
use crate::giveaway::index::{ActiveGame, GameIndex};
use crate::giveaway::pending::{PendingCreations, PendingGuess};
use crate::giveaway::render;
use crate::giveaway::surface::{GiveawayCard, GiveawaySurface, Reaction};
use crate::utils::time::Clock;

static INTEGER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d+$").expect("integer pattern is valid"));

/// Discord caps thread names at 100 characters.
const MAX_THREAD_NAME: usize = 100;

/// Parses strictly formatted integers (`42`, `-7`). Anything else, including
/// values that overflow `i64`, is `None`.
pub fn parse_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if !INTEGER_RE.is_match(trimmed) {
        return None;
    }
    trimmed.parse::<i64>().ok()
}

/// How a guesser still on cooldown is told to slow down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RateLimitFeedback {
    /// React to the guess with an hourglass.
    Reaction,
    /// Reply, then delete the reply after a few seconds.
    Reply,
}

#[derive(Debug, Clone)]
pub struct GiveawayPolicy {
    /// Shortest duration accepted at creation and edit time.
    pub min_duration_ms: i64,
    /// Longest duration accepted at creation and edit time.
    pub max_duration_ms: i64,
    pub rate_limit_feedback: RateLimitFeedback,
    /// Lifetime of the cooldown reply when `rate_limit_feedback == Reply`.
    pub cooldown_reply_ttl: Duration,
}

impl Default for GiveawayPolicy {
    fn default() -> Self {
        Self {
            min_duration_ms: 3 * 60 * 1000,
            max_duration_ms: 365 * 24 * 60 * 60 * 1000,
            rate_limit_feedback: RateLimitFeedback::Reaction,
            cooldown_reply_ttl: Duration::from_secs(3),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClassicRequest {
    pub organizer_id: String,
    pub channel_id: String,
    pub guild_id: Option<String>,
    pub prize: String,
    pub duration: String,
    pub winner_count: i64,
    pub required_role_id: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GuessRequest {
    pub organizer_id: String,
    pub channel_id: String,
    pub guild_id: Option<String>,
    pub prize: String,
    pub duration: String,
    pub required_role_id: Option<String>,
    pub image_url: Option<String>,
    pub hints: Option<bool>,
    /// Human duration, e.g. `30s`. Defaults to one minute.
    pub cooldown: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EditRequest {
    pub message_id: String,
    pub new_prize: Option<String>,
    /// Measured from now, not from the old deadline.
    pub new_duration: Option<String>,
}

#[derive(Debug)]
pub struct EditOutcome {
    pub giveaway: Giveaway,
    /// Set when the store was updated but the card could not be refreshed.
    pub display_error: Option<Error>,
}

#[derive(Debug, Clone)]
pub struct JoinRequest {
    pub message_id: String,
    pub user_id: String,
    pub member_roles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// `participants` is `None` if the recount failed after the insert.
    Joined { participants: Option<i64> },
    AlreadyJoined,
}

/// A message posted somewhere the bot can see; only thread messages of
/// active guess games are evaluated.
#[derive(Debug, Clone)]
pub struct GuessMessage {
    pub channel_id: String,
    pub message_id: String,
    pub author_id: String,
    pub author_is_bot: bool,
    pub member_roles: Vec<String>,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    Ignored,
    RateLimited,
    Miss,
    /// The secret number is above the guess.
    Higher,
    /// The secret number is below the guess.
    Lower,
    Won,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    GuessExpired { message_id: String, secret_number: i64 },
    NoParticipants { message_id: String },
    Drawn { message_id: String, winners: Vec<String> },
}

pub struct GiveawayEngine {
    giveaways: Arc<dyn GiveawayRepository>,
    participants: Arc<dyn ParticipantRepository>,
    surface: Arc<dyn GiveawaySurface>,
    clock: Arc<dyn Clock>,
    policy: GiveawayPolicy,
    index: GameIndex,
    cooldowns: CooldownTracker,
    pending: PendingCreations,
}

impl GiveawayEngine {
    pub fn new(
        giveaways: Arc<dyn GiveawayRepository>,
        participants: Arc<dyn ParticipantRepository>,
        surface: Arc<dyn GiveawaySurface>,
        clock: Arc<dyn Clock>,
        policy: GiveawayPolicy,
    ) -> Self {
        Self {
            giveaways,
            participants,
            surface,
            clock,
            policy,
            index: GameIndex::new(),
            cooldowns: CooldownTracker::new(),
            pending: PendingCreations::new(),
        }
    }

    pub fn index(&self) -> &GameIndex {
        &self.index
    }

    pub fn cooldowns(&self) -> &CooldownTracker {
        &self.cooldowns
    }

    pub fn pending(&self) -> &PendingCreations {
        &self.pending
    }

    pub fn policy(&self) -> &GiveawayPolicy {
        &self.policy
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    // ------------------------------------------------------------------
    // Startup
    // ------------------------------------------------------------------

    /// Reloads the game index from every active guess giveaway in the store.
    pub async fn rebuild_index(&self) -> Result<usize, Error> {
        let rows = self.giveaways.list_active_guess().await?;
        self.index.clear();
        for row in rows {
            match ActiveGame::from_giveaway(&row) {
                Ok(game) => self.index.insert(game),
                Err(e) => warn!("Skipping guess giveaway {} during index rebuild: {e}", row.message_id),
            }
        }
        info!("Loaded {} active guess games.", self.index.len());
        Ok(self.index.len())
    }

    // ------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------

    fn validate_duration(&self, raw: &str) -> Result<i64, Error> {
        let ms = parse_duration(raw)?;
        if ms < self.policy.min_duration_ms {
            return Err(Error::DurationTooShort { min_ms: self.policy.min_duration_ms });
        }
        if ms > self.policy.max_duration_ms {
            return Err(Error::DurationTooLong { max_ms: self.policy.max_duration_ms });
        }
        Ok(ms)
    }

    fn deadline_after(&self, duration_ms: i64) -> Result<i64, Error> {
        self.clock
            .now_ms()
            .checked_add(duration_ms)
            .ok_or_else(|| Error::InvalidDuration(format!("{duration_ms}ms")))
    }

    fn validate_prize(prize: &str) -> Result<(), Error> {
        if prize.chars().count() > MAX_PRIZE_CHARS {
            return Err(Error::PrizeTooLong { max_chars: MAX_PRIZE_CHARS });
        }
        Ok(())
    }

    fn validate_cooldown(raw: Option<&str>) -> Result<i64, Error> {
        let Some(raw) = raw else {
            return Ok(DEFAULT_COOLDOWN_MS);
        };
        let ms = parse_duration(raw).map_err(|_| Error::InvalidCooldown(raw.to_string()))?;
        if ms < MIN_COOLDOWN_MS {
            return Err(Error::InvalidCooldown(raw.to_string()));
        }
        Ok(ms)
    }

    /// Publishes a classic card and persists the giveaway under the new
    /// message id. If persisting fails the card is deleted again.
    pub async fn create_classic(&self, req: ClassicRequest) -> Result<Giveaway, Error> {
        Self::validate_prize(&req.prize)?;
        let duration_ms = self.validate_duration(&req.duration)?;
        let end_timestamp = self.deadline_after(duration_ms)?;
        if req.winner_count < 1 {
            return Err(Error::InvalidWinnerCount(req.winner_count));
        }
        let winner_count =
            u32::try_from(req.winner_count).map_err(|_| Error::InvalidWinnerCount(req.winner_count))?;

        let mut new = NewGiveaway {
            message_id: String::new(),
            channel_id: req.channel_id.clone(),
            thread_id: None,
            guild_id: req.guild_id.clone(),
            organizer_id: req.organizer_id.clone(),
            prize: req.prize.clone(),
            image_url: req.image_url.clone(),
            end_timestamp,
            type_data: TypeData::Classic {
                required_role_id: req.required_role_id.clone(),
                winner_count,
            },
        };

        let card = render::classic_active(&new.to_giveaway(Utc::now()), 0);
        new.message_id = self.surface.publish(&req.channel_id, &card).await?;

        match self.giveaways.insert_giveaway(&new).await {
            Ok(giveaway) => {
                info!(
                    "Classic giveaway {} created by {} in {} (winners={}, ends={})",
                    giveaway.message_id, giveaway.organizer_id, giveaway.channel_id,
                    winner_count, giveaway.end_timestamp
                );
                Ok(giveaway)
            }
            Err(e) => {
                error!("Failed to persist classic giveaway {}: {e:?}", new.message_id);
                self.discard_card(&new.channel_id, &new.message_id).await;
                Err(e)
            }
        }
    }

    /// First step of a guess game: validate and park the parameters until the
    /// organizer submits the secret number.
    pub fn begin_guess(&self, req: GuessRequest) -> Result<(), Error> {
        Self::validate_prize(&req.prize)?;
        let duration_ms = self.validate_duration(&req.duration)?;
        let cooldown_ms = Self::validate_cooldown(req.cooldown.as_deref())?;

        debug!("Pending guess giveaway for organizer {}", req.organizer_id);
        self.pending.put(PendingGuess {
            organizer_id: req.organizer_id,
            channel_id: req.channel_id,
            guild_id: req.guild_id,
            prize: req.prize,
            duration_ms,
            required_role_id: req.required_role_id,
            image_url: req.image_url,
            hints_enabled: req.hints.unwrap_or(false),
            cooldown_ms,
            created_at_ms: self.clock.now_ms(),
        });
        Ok(())
    }

    /// Second step of a guess game. Returns `Ok(None)` when the organizer has
    /// nothing pending (expired prompt, duplicate submission).
    pub async fn complete_guess(
        &self,
        organizer_id: &str,
        raw_secret: &str,
    ) -> Result<Option<Giveaway>, Error> {
        let secret_number = parse_integer(raw_secret)
            .ok_or_else(|| Error::InvalidSecretNumber(raw_secret.to_string()))?;

        let Some(pending) = self.pending.take(organizer_id) else {
            debug!("No pending guess giveaway for {organizer_id}; ignoring submission");
            return Ok(None);
        };
        let end_timestamp = self.deadline_after(pending.duration_ms)?;

        let mut new = NewGiveaway {
            message_id: String::new(),
            channel_id: pending.channel_id.clone(),
            thread_id: None,
            guild_id: pending.guild_id.clone(),
            organizer_id: pending.organizer_id.clone(),
            prize: pending.prize.clone(),
            image_url: pending.image_url.clone(),
            end_timestamp,
            type_data: TypeData::Guess {
                secret_number,
                required_role_id: pending.required_role_id.clone(),
                hints_enabled: pending.hints_enabled,
                cooldown_ms: pending.cooldown_ms,
            },
        };

        let card = render::guess_active(&new.to_giveaway(Utc::now()));
        new.message_id = self.surface.publish(&new.channel_id, &card).await?;

        let thread_name: String = format!("Guess: {}", pending.prize)
            .chars()
            .take(MAX_THREAD_NAME)
            .collect();
        match self
            .surface
            .open_thread(&new.channel_id, &new.message_id, &thread_name)
            .await
        {
            Ok(thread_id) => new.thread_id = Some(thread_id),
            Err(e) => {
                error!("Failed to open thread for guess giveaway {}: {e:?}", new.message_id);
                self.discard_card(&new.channel_id, &new.message_id).await;
                return Err(e);
            }
        }

        let giveaway = match self.giveaways.insert_giveaway(&new).await {
            Ok(g) => g,
            Err(e) => {
                error!("Failed to persist guess giveaway {}: {e:?}", new.message_id);
                self.discard_card(&new.channel_id, &new.message_id).await;
                return Err(e);
            }
        };

        let game = ActiveGame::from_giveaway(&giveaway)?;
        let thread_id = game.thread_id.clone();
        self.index.insert(game);
        info!(
            "Guess giveaway {} created by {} (thread={}, ends={})",
            giveaway.message_id, giveaway.organizer_id, thread_id, giveaway.end_timestamp
        );

        let intro = render::guess_intro(pending.cooldown_ms, pending.hints_enabled);
        if let Err(e) = self.surface.post(&thread_id, &intro).await {
            warn!("Could not post intro into thread {thread_id}: {e:?}");
        }

        Ok(Some(giveaway))
    }

    async fn discard_card(&self, channel_id: &str, message_id: &str) {
        if let Err(e) = self.surface.delete(channel_id, message_id).await {
            warn!("Could not delete orphaned giveaway card {message_id}: {e:?}");
        }
    }

    // ------------------------------------------------------------------
    // Edit
    // ------------------------------------------------------------------

    pub async fn edit(&self, req: EditRequest) -> Result<EditOutcome, Error> {
        let new_prize = req
            .new_prize
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        if new_prize.is_none() && req.new_duration.is_none() {
            return Err(Error::NothingToUpdate);
        }
        if let Some(prize) = new_prize.as_deref() {
            Self::validate_prize(prize)?;
        }
        let new_end = match req.new_duration.as_deref() {
            Some(raw) => Some(self.deadline_after(self.validate_duration(raw)?)?),
            None => None,
        };

        let existing = self
            .giveaways
            .get_giveaway(&req.message_id)
            .await?
            .ok_or_else(|| Error::NotFound(req.message_id.clone()))?;
        if !existing.is_active() {
            return Err(Error::AlreadyEnded(req.message_id));
        }

        let patch = GiveawayPatch { prize: new_prize, end_timestamp: new_end };
        let updated = self
            .giveaways
            .update_active(&req.message_id, &patch)
            .await?
            .ok_or_else(|| Error::AlreadyEnded(req.message_id.clone()))?;

        if updated.kind == GiveawayKind::Guess {
            self.index
                .apply_edit(&updated.message_id, patch.prize.as_deref(), patch.end_timestamp);
        }
        info!("Giveaway {} edited: {:?}", updated.message_id, patch);

        let display_error = match self.refresh_active_card(&updated).await {
            Ok(()) => None,
            Err(e) => {
                warn!("Giveaway {} updated but its card is stale: {e:?}", updated.message_id);
                Some(Error::DisplaySync(e.to_string()))
            }
        };

        Ok(EditOutcome { giveaway: updated, display_error })
    }

    /// Re-renders the card of an active giveaway from its stored state.
    async fn refresh_active_card(&self, g: &Giveaway) -> Result<(), Error> {
        let card = match g.kind {
            GiveawayKind::Classic => {
                let count = self.participants.count_participants(&g.message_id).await?;
                render::classic_active(g, count)
            }
            GiveawayKind::Guess => render::guess_active(g),
        };
        self.surface.update(&g.channel_id, &g.message_id, &card).await
    }

    // ------------------------------------------------------------------
    // Participation
    // ------------------------------------------------------------------

    pub async fn join(&self, req: JoinRequest) -> Result<JoinOutcome, Error> {
        let giveaway = self
            .giveaways
            .get_giveaway(&req.message_id)
            .await?
            .filter(|g| g.kind == GiveawayKind::Classic)
            .ok_or_else(|| Error::NotFound(req.message_id.clone()))?;
        if !giveaway.is_active() {
            return Err(Error::AlreadyEnded(req.message_id));
        }

        if let Some(role_id) = giveaway.required_role_id() {
            if !req.member_roles.iter().any(|r| r == role_id) {
                return Err(Error::RoleRequired(role_id.to_string()));
            }
        }

        let entry = Participant {
            giveaway_id: giveaway.message_id.clone(),
            user_id: req.user_id.clone(),
            joined_at: self.clock.now_ms(),
        };
        match self.participants.insert_participant(&entry).await {
            Ok(()) => {}
            Err(Error::AlreadyJoined) => {
                debug!("{} already joined {}", req.user_id, giveaway.message_id);
                return Ok(JoinOutcome::AlreadyJoined);
            }
            Err(e) => return Err(e),
        }
        debug!("{} joined giveaway {}", req.user_id, giveaway.message_id);

        let participants = match self.participants.count_participants(&giveaway.message_id).await {
            Ok(count) => {
                let card = render::classic_active(&giveaway, count);
                if let Err(e) = self
                    .surface
                    .update(&giveaway.channel_id, &giveaway.message_id, &card)
                    .await
                {
                    warn!("Could not refresh entry counter of {}: {e:?}", giveaway.message_id);
                }
                Some(count)
            }
            Err(e) => {
                warn!("Could not count participants of {}: {e:?}", giveaway.message_id);
                None
            }
        };

        Ok(JoinOutcome::Joined { participants })
    }

    // ------------------------------------------------------------------
    // Guess evaluation
    // ------------------------------------------------------------------

    pub async fn handle_guess(&self, msg: GuessMessage) -> Result<GuessOutcome, Error> {
        if msg.author_is_bot {
            return Ok(GuessOutcome::Ignored);
        }
        let Some(game) = self.index.get(&msg.channel_id) else {
            return Ok(GuessOutcome::Ignored);
        };
        let Some(guess) = parse_integer(&msg.content) else {
            return Ok(GuessOutcome::Ignored);
        };
        if let Some(role_id) = game.required_role_id.as_deref() {
            if !msg.member_roles.iter().any(|r| r == role_id) {
                debug!("{} lacks role {role_id} for game {}", msg.author_id, game.thread_id);
                return Ok(GuessOutcome::Ignored);
            }
        }

        let now = self.clock.now_ms();
        if !self
            .cooldowns
            .try_acquire(&game.thread_id, &msg.author_id, now, game.cooldown_ms)
        {
            self.signal_cooldown(&msg, game.cooldown_ms).await;
            return Ok(GuessOutcome::RateLimited);
        }

        if guess == game.secret_number {
            return if self.resolve_win(&game.thread_id, &msg.author_id).await? {
                Ok(GuessOutcome::Won)
            } else {
                Ok(GuessOutcome::Ignored)
            };
        }

        let (outcome, reaction) = if !game.hints_enabled {
            (GuessOutcome::Miss, Reaction::Miss)
        } else if game.secret_number > guess {
            (GuessOutcome::Higher, Reaction::Higher)
        } else {
            (GuessOutcome::Lower, Reaction::Lower)
        };
        if let Err(e) = self.surface.react(&msg.channel_id, &msg.message_id, reaction).await {
            warn!("Could not react to guess {}: {e:?}", msg.message_id);
        }
        Ok(outcome)
    }

    async fn signal_cooldown(&self, msg: &GuessMessage, cooldown_ms: i64) {
        let result = match self.policy.rate_limit_feedback {
            RateLimitFeedback::Reaction => {
                self.surface
                    .react(&msg.channel_id, &msg.message_id, Reaction::Cooldown)
                    .await
            }
            RateLimitFeedback::Reply => {
                self.surface
                    .reply_transient(
                        &msg.channel_id,
                        &msg.message_id,
                        &render::cooldown_notice(cooldown_ms),
                        self.policy.cooldown_reply_ttl,
                    )
                    .await
            }
        };
        if let Err(e) = result {
            warn!("Could not send cooldown notice to {}: {e:?}", msg.author_id);
        }
    }

    // ------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------

    /// Ends the guess game running in `thread_id` with `winner_id` as winner.
    /// Returns `false` if the game was already resolved by someone else.
    pub async fn resolve_win(&self, thread_id: &str, winner_id: &str) -> Result<bool, Error> {
        let Some(game) = self.index.remove(thread_id) else {
            return Ok(false);
        };
        match self.giveaways.mark_ended(&game.message_id).await {
            Ok(true) => {}
            Ok(false) => {
                info!("Guess giveaway {} was already ended", game.message_id);
                return Ok(false);
            }
            Err(e) => {
                // put it back so a later guess or the expiry poll can retry
                self.index.insert(game);
                return Err(e);
            }
        }
        self.cooldowns.forget_game(thread_id);
        info!(
            "Guess giveaway {} won by {winner_id} (number {})",
            game.message_id, game.secret_number
        );

        match self.giveaways.get_giveaway(&game.message_id).await {
            Ok(Some(row)) => {
                let card = render::guess_won(&row, winner_id, game.secret_number);
                self.update_card_logged(&game.channel_id, &game.message_id, &card).await;
            }
            Ok(None) => warn!("Guess giveaway {} vanished from the store", game.message_id),
            Err(e) => warn!("Could not reload guess giveaway {}: {e:?}", game.message_id),
        }
        self.close_thread(
            thread_id,
            &render::guess_win_announcement(winner_id, game.secret_number),
        )
        .await;
        Ok(true)
    }

    /// Resolves every active giveaway whose deadline has passed.
    pub async fn resolve_expired(&self) -> Result<Vec<Resolution>, Error> {
        let now = self.clock.now_ms();
        let expired = self.giveaways.list_expired(now).await?;
        let mut resolutions = Vec::with_capacity(expired.len());
        for giveaway in expired {
            let message_id = giveaway.message_id.clone();
            info!("Ending giveaway: {} (Type: {})", message_id, giveaway.kind);
            match self.expire(giveaway).await {
                Ok(Some(resolution)) => resolutions.push(resolution),
                Ok(None) => debug!("Giveaway {message_id} was resolved concurrently"),
                Err(e) => error!("Failed to resolve expired giveaway {message_id}: {e:?}"),
            }
        }
        Ok(resolutions)
    }

    /// Expires one giveaway. `Ok(None)` means another path already ended it.
    ///
    /// Classic entrants are read before the status transition, so a failed
    /// read leaves the giveaway active for the next poll.
    pub async fn expire(&self, giveaway: Giveaway) -> Result<Option<Resolution>, Error> {
        let entrants: Vec<String> = match giveaway.kind {
            GiveawayKind::Classic => self
                .participants
                .list_participants(&giveaway.message_id)
                .await?
                .into_iter()
                .map(|p| p.user_id)
                .collect(),
            GiveawayKind::Guess => Vec::new(),
        };

        if !self.giveaways.mark_ended(&giveaway.message_id).await? {
            return Ok(None);
        }

        match &giveaway.type_data {
            TypeData::Guess { secret_number, .. } => {
                let secret_number = *secret_number;
                if let Some(thread_id) = giveaway.thread_id.as_deref() {
                    self.index.remove(thread_id);
                    self.cooldowns.forget_game(thread_id);
                }
                let card = render::guess_expired(&giveaway, secret_number);
                self.update_card_logged(&giveaway.channel_id, &giveaway.message_id, &card)
                    .await;
                if let Some(thread_id) = giveaway.thread_id.as_deref() {
                    self.close_thread(thread_id, &render::guess_expired_announcement(secret_number))
                        .await;
                }
                Ok(Some(Resolution::GuessExpired {
                    message_id: giveaway.message_id,
                    secret_number,
                }))
            }
            TypeData::Classic { winner_count, .. } => {
                if entrants.is_empty() {
                    let card = render::classic_empty(&giveaway);
                    self.update_card_logged(&giveaway.channel_id, &giveaway.message_id, &card)
                        .await;
                    return Ok(Some(Resolution::NoParticipants { message_id: giveaway.message_id }));
                }

                let winners = draw_winners(entrants, *winner_count as usize, &mut rand::rng());
                info!("Giveaway {} winners: {:?}", giveaway.message_id, winners);

                for announcement in render::classic_announcements(&winners, &giveaway.prize) {
                    if let Err(e) = self.surface.post(&giveaway.channel_id, &announcement).await {
                        warn!("Could not announce winners of {}: {e:?}", giveaway.message_id);
                        break;
                    }
                }
                let card = render::classic_drawn(&giveaway, &winners);
                self.update_card_logged(&giveaway.channel_id, &giveaway.message_id, &card)
                    .await;
                Ok(Some(Resolution::Drawn { message_id: giveaway.message_id, winners }))
            }
        }
    }

    async fn update_card_logged(&self, channel_id: &str, message_id: &str, card: &GiveawayCard) {
        if let Err(e) = self.surface.update(channel_id, message_id, card).await {
            warn!("Could not update giveaway card {message_id}: {e:?}");
        }
    }

    async fn close_thread(&self, thread_id: &str, announcement: &str) {
        if let Err(e) = self.surface.post(thread_id, announcement).await {
            warn!("Could not post into thread {thread_id}: {e:?}");
        }
        if let Err(e) = self.surface.archive_thread(thread_id).await {
            warn!("Could not archive thread {thread_id}: {e:?}");
        }
    }

    // ------------------------------------------------------------------
    // Housekeeping
    // ------------------------------------------------------------------

    /// Drops stale cooldown entries and abandoned guess prompts.
    /// Returns `(cooldowns_removed, pending_removed)`.
    pub fn sweep_volatile(&self, cooldown_retention_ms: i64, pending_ttl_ms: i64) -> (usize, usize) {
        let now = self.clock.now_ms();
        (
            self.cooldowns.sweep(now, cooldown_retention_ms),
            self.pending.sweep(now, pending_ttl_ms),
        )
    }
}
