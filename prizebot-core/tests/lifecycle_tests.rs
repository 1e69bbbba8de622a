// tests/lifecycle_tests.rs
//
// End-to-end giveaway scenarios against the in-memory store, a recording
// surface and a manual clock.

use std::collections::HashSet;

use tokio_test::{assert_err, assert_ok};

use prizebot_core::Error;
use prizebot_core::giveaway::index::ActiveGame;
use prizebot_core::giveaway::{
    ClassicRequest, EditRequest, GiveawayPolicy, GuessMessage, GuessOutcome, GuessRequest,
    JoinOutcome, JoinRequest, RateLimitFeedback, Reaction, Resolution,
};
use prizebot_core::test_utils::{SurfaceCall, SurfaceOp, TestRig};
use prizebot_common::models::{GiveawayStatus, TypeData, MAX_PRIZE_CHARS};
use prizebot_common::traits::repository_traits::{GiveawayRepository, ParticipantRepository};

const T0: i64 = 1_700_000_000_000;
const MINUTE: i64 = 60_000;

fn classic(duration: &str, winners: i64, role: Option<&str>) -> ClassicRequest {
    ClassicRequest {
        organizer_id: "organizer".into(),
        channel_id: "channel".into(),
        guild_id: Some("guild".into()),
        prize: "Nitro".into(),
        duration: duration.into(),
        winner_count: winners,
        required_role_id: role.map(str::to_string),
        image_url: None,
    }
}

fn guess_request(hints: bool, cooldown: Option<&str>, role: Option<&str>) -> GuessRequest {
    GuessRequest {
        organizer_id: "organizer".into(),
        channel_id: "channel".into(),
        guild_id: Some("guild".into()),
        prize: "Steam key".into(),
        duration: "10m".into(),
        required_role_id: role.map(str::to_string),
        image_url: Some("https://cdn.example/key.png".into()),
        hints: Some(hints),
        cooldown: cooldown.map(str::to_string),
    }
}

fn join(message_id: &str, user: &str, roles: &[&str]) -> JoinRequest {
    JoinRequest {
        message_id: message_id.into(),
        user_id: user.into(),
        member_roles: roles.iter().map(|r| r.to_string()).collect(),
    }
}

fn guess(thread_id: &str, message_id: &str, author: &str, content: &str) -> GuessMessage {
    GuessMessage {
        channel_id: thread_id.into(),
        message_id: message_id.into(),
        author_id: author.into(),
        author_is_bot: false,
        member_roles: vec![],
        content: content.into(),
    }
}

/// Creates a guess game and returns `(card message id, thread id)`.
async fn start_guess(rig: &TestRig, secret: &str, req: GuessRequest) -> (String, String) {
    rig.engine.begin_guess(req).unwrap();
    let giveaway = rig
        .engine
        .complete_guess("organizer", secret)
        .await
        .unwrap()
        .expect("a pending creation");
    let thread_id = giveaway.thread_id.clone().expect("guess giveaways have a thread");
    (giveaway.message_id, thread_id)
}

// ---------------------------------------------------------------------------
// Classic giveaways
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_classic_scenario_two_winners_from_three_joiners() -> Result<(), Error> {
    let rig = TestRig::new(T0);
    let g = rig.engine.create_classic(classic("3m", 2, None)).await?;
    assert_eq!(g.end_timestamp, T0 + 3 * MINUTE);
    assert!(rig.surface.last_card(&g.message_id).unwrap().join_button);

    for user in ["alice", "bob", "carol"] {
        let outcome = rig.engine.join(join(&g.message_id, user, &[])).await?;
        assert!(matches!(outcome, JoinOutcome::Joined { .. }));
    }
    let card = rig.surface.last_card(&g.message_id).unwrap();
    assert!(card.description.contains("**Entries:** 3"));

    // not due yet
    rig.clock.advance_ms(3 * MINUTE - 1);
    assert!(rig.engine.resolve_expired().await?.is_empty());

    rig.clock.advance_ms(1);
    let resolutions = rig.engine.resolve_expired().await?;
    let winners = match resolutions.as_slice() {
        [Resolution::Drawn { message_id, winners }] => {
            assert_eq!(message_id, &g.message_id);
            winners.clone()
        }
        other => panic!("unexpected resolutions: {other:?}"),
    };

    assert_eq!(winners.len(), 2);
    let distinct: HashSet<_> = winners.iter().collect();
    assert_eq!(distinct.len(), 2);
    assert!(winners.iter().all(|w| ["alice", "bob", "carol"].contains(&w.as_str())));

    assert_eq!(rig.store.snapshot(&g.message_id).unwrap().status, GiveawayStatus::Ended);
    let final_card = rig.surface.last_card(&g.message_id).unwrap();
    assert!(!final_card.join_button);
    for w in &winners {
        assert!(final_card.description.contains(&format!("<@{w}>")));
    }
    let announcements = rig.surface.posts_in("channel");
    assert_eq!(announcements.len(), 1);
    assert!(announcements[0].contains("Nitro"));
    Ok(())
}

#[tokio::test]
async fn test_winner_count_larger_than_entries_draws_everyone() -> Result<(), Error> {
    let rig = TestRig::new(T0);
    let g = rig.engine.create_classic(classic("5m", 10, None)).await?;
    rig.engine.join(join(&g.message_id, "alice", &[])).await?;
    rig.engine.join(join(&g.message_id, "bob", &[])).await?;

    rig.clock.advance_ms(5 * MINUTE);
    match rig.engine.resolve_expired().await?.as_slice() {
        [Resolution::Drawn { winners, .. }] => {
            let mut sorted = winners.clone();
            sorted.sort();
            assert_eq!(sorted, vec!["alice".to_string(), "bob".to_string()]);
        }
        other => panic!("unexpected resolutions: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_classic_without_participants_ends_with_no_winner_card() -> Result<(), Error> {
    let rig = TestRig::new(T0);
    let g = rig.engine.create_classic(classic("3m", 1, None)).await?;

    rig.clock.advance_ms(4 * MINUTE);
    let resolutions = rig.engine.resolve_expired().await?;
    assert_eq!(
        resolutions,
        vec![Resolution::NoParticipants { message_id: g.message_id.clone() }]
    );
    let card = rig.surface.last_card(&g.message_id).unwrap();
    assert!(card.description.contains("No one joined"));
    assert!(!card.join_button);
    assert!(rig.surface.posts_in("channel").is_empty());
    Ok(())
}

#[tokio::test]
async fn test_repeated_joins_store_one_participant() -> Result<(), Error> {
    let rig = TestRig::new(T0);
    let g = rig.engine.create_classic(classic("3m", 1, None)).await?;

    let first = rig.engine.join(join(&g.message_id, "alice", &[])).await?;
    assert_eq!(first, JoinOutcome::Joined { participants: Some(1) });
    for _ in 0..3 {
        let again = rig.engine.join(join(&g.message_id, "alice", &[])).await?;
        assert_eq!(again, JoinOutcome::AlreadyJoined);
    }
    assert_eq!(rig.store.count_participants(&g.message_id).await?, 1);
    Ok(())
}

#[tokio::test]
async fn test_concurrent_joins_by_same_user_insert_once() -> Result<(), Error> {
    let rig = TestRig::new(T0);
    let g = rig.engine.create_classic(classic("3m", 1, None)).await?;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let engine = rig.engine.clone();
        let id = g.message_id.clone();
        handles.push(tokio::spawn(async move {
            engine.join(join(&id, "alice", &[])).await
        }));
    }
    let mut joined = 0;
    for h in handles {
        if let JoinOutcome::Joined { .. } = h.await.unwrap()? {
            joined += 1;
        }
    }
    assert_eq!(joined, 1);
    assert_eq!(rig.store.count_participants(&g.message_id).await?, 1);
    Ok(())
}

#[tokio::test]
async fn test_role_gated_join_without_role_inserts_nothing() -> Result<(), Error> {
    let rig = TestRig::new(T0);
    let g = rig.engine.create_classic(classic("3m", 1, Some("vip"))).await?;

    let err = rig
        .engine
        .join(join(&g.message_id, "alice", &["member"]))
        .await
        .unwrap_err();
    assert!(matches!(&err, Error::RoleRequired(role) if role == "vip"));
    assert_eq!(err.user_message(), "You need the <@&vip> role to join.");
    assert_eq!(rig.store.count_participants(&g.message_id).await?, 0);

    let ok = rig.engine.join(join(&g.message_id, "bob", &["member", "vip"])).await?;
    assert_eq!(ok, JoinOutcome::Joined { participants: Some(1) });
    Ok(())
}

#[tokio::test]
async fn test_join_rejects_unknown_ended_and_guess_giveaways() -> Result<(), Error> {
    let rig = TestRig::new(T0);
    assert!(matches!(
        rig.engine.join(join("nope", "alice", &[])).await,
        Err(Error::NotFound(_))
    ));

    let g = rig.engine.create_classic(classic("3m", 1, None)).await?;
    rig.clock.advance_ms(3 * MINUTE);
    rig.engine.resolve_expired().await?;
    assert!(matches!(
        rig.engine.join(join(&g.message_id, "alice", &[])).await,
        Err(Error::AlreadyEnded(_))
    ));

    let (card_id, _) = start_guess(&rig, "5", guess_request(false, None, None)).await;
    assert!(matches!(
        rig.engine.join(join(&card_id, "alice", &[])).await,
        Err(Error::NotFound(_))
    ));
    Ok(())
}

#[tokio::test]
async fn test_join_survives_counter_refresh_failure() -> Result<(), Error> {
    let rig = TestRig::new(T0);
    let g = rig.engine.create_classic(classic("3m", 1, None)).await?;
    rig.surface.fail(SurfaceOp::Update);

    let outcome = rig.engine.join(join(&g.message_id, "alice", &[])).await?;
    assert_eq!(outcome, JoinOutcome::Joined { participants: Some(1) });

    rig.store.fail_participant_reads(true);
    let outcome = rig.engine.join(join(&g.message_id, "bob", &[])).await?;
    assert_eq!(outcome, JoinOutcome::Joined { participants: None });
    Ok(())
}

#[tokio::test]
async fn test_failed_persist_removes_orphaned_card() {
    let rig = TestRig::new(T0);
    rig.store.fail_inserts(true);

    assert_err!(rig.engine.create_classic(classic("3m", 1, None)).await);
    assert_eq!(rig.store.giveaway_count(), 0);
    assert_eq!(rig.surface.count(|c| matches!(c, SurfaceCall::Delete { .. })), 1);
}

#[tokio::test]
async fn test_failed_publish_persists_nothing() {
    let rig = TestRig::new(T0);
    rig.surface.fail(SurfaceOp::Publish);

    assert_err!(rig.engine.create_classic(classic("3m", 1, None)).await);
    assert_eq!(rig.store.giveaway_count(), 0);
}

#[tokio::test]
async fn test_classic_creation_validation() {
    let rig = TestRig::new(T0);
    assert!(matches!(
        rig.engine.create_classic(classic("soon", 1, None)).await,
        Err(Error::InvalidDuration(_))
    ));
    assert!(matches!(
        rig.engine.create_classic(classic("1m", 1, None)).await,
        Err(Error::DurationTooShort { .. })
    ));
    assert!(matches!(
        rig.engine.create_classic(classic("1h", -3, None)).await,
        Err(Error::InvalidWinnerCount(-3))
    ));
    assert!(rig.surface.calls().is_empty());
}

#[tokio::test]
async fn test_creation_rejects_overlong_prize_and_duration() {
    let rig = TestRig::new(T0);
    let long_prize = ClassicRequest { prize: "x".repeat(MAX_PRIZE_CHARS + 1), ..classic("1h", 1, None) };
    assert!(matches!(
        rig.engine.create_classic(long_prize).await,
        Err(Error::PrizeTooLong { max_chars: MAX_PRIZE_CHARS })
    ));
    let at_limit = ClassicRequest { prize: "x".repeat(MAX_PRIZE_CHARS), ..classic("1h", 1, None) };
    assert_ok!(rig.engine.create_classic(at_limit).await);
    rig.surface.clear();

    assert!(matches!(
        rig.engine.create_classic(classic("2y", 1, None)).await,
        Err(Error::DurationTooLong { .. })
    ));
    assert!(matches!(
        rig.engine.create_classic(classic("292271000y", 1, None)).await,
        Err(Error::DurationTooLong { .. })
    ));
    let guess_prize = GuessRequest { prize: "y".repeat(MAX_PRIZE_CHARS + 1), ..guess_request(false, None, None) };
    assert!(matches!(rig.engine.begin_guess(guess_prize), Err(Error::PrizeTooLong { .. })));
    assert!(rig.engine.pending().is_empty());
    assert!(rig.surface.calls().is_empty());
    assert_eq!(rig.store.giveaway_count(), 1);
}

#[tokio::test]
async fn test_deadline_overflow_is_an_invalid_duration() -> Result<(), Error> {
    let rig = TestRig::with_policy(
        T0,
        GiveawayPolicy { max_duration_ms: i64::MAX, ..GiveawayPolicy::default() },
    );

    assert!(matches!(
        rig.engine.create_classic(classic("292271000y", 1, None)).await,
        Err(Error::InvalidDuration(_))
    ));
    assert!(rig.surface.calls().is_empty());

    let huge = GuessRequest { duration: "292271000y".into(), ..guess_request(false, None, None) };
    assert_ok!(rig.engine.begin_guess(huge));
    assert!(matches!(
        rig.engine.complete_guess("organizer", "42").await,
        Err(Error::InvalidDuration(_))
    ));
    assert!(rig.surface.calls().is_empty());

    let g = rig.engine.create_classic(classic("1h", 1, None)).await?;
    let edit = EditRequest {
        message_id: g.message_id.clone(),
        new_prize: None,
        new_duration: Some("292271000y".into()),
    };
    assert!(matches!(rig.engine.edit(edit).await, Err(Error::InvalidDuration(_))));
    assert_eq!(rig.store.snapshot(&g.message_id).unwrap().end_timestamp, T0 + 60 * MINUTE);
    Ok(())
}

#[tokio::test]
async fn test_large_draw_fits_message_limits() -> Result<(), Error> {
    let rig = TestRig::new(T0);
    let g = rig.engine.create_classic(classic("3m", 200, None)).await?;
    for i in 0..200u64 {
        let user = (100_000_000_000_000_000u64 + i).to_string();
        rig.engine.join(join(&g.message_id, &user, &[])).await?;
    }

    rig.clock.advance_ms(3 * MINUTE);
    match rig.engine.resolve_expired().await?.as_slice() {
        [Resolution::Drawn { winners, .. }] => assert_eq!(winners.len(), 200),
        other => panic!("unexpected resolutions: {other:?}"),
    }

    let announcements = rig.surface.posts_in("channel");
    assert!(announcements.len() > 1);
    assert!(announcements.iter().all(|m| m.chars().count() <= 2000));
    let card = rig.surface.last_card(&g.message_id).unwrap();
    assert!(!card.join_button);
    assert!(card.description.chars().count() <= 4096);
    assert!(card.description.contains("and 150 more"));
    Ok(())
}

#[tokio::test]
async fn test_failed_entrant_read_leaves_giveaway_for_next_poll() -> Result<(), Error> {
    let rig = TestRig::new(T0);
    let g = rig.engine.create_classic(classic("3m", 1, None)).await?;
    rig.engine.join(join(&g.message_id, "alice", &[])).await?;

    rig.clock.advance_ms(3 * MINUTE);
    rig.store.fail_participant_reads(true);
    assert!(rig.engine.resolve_expired().await?.is_empty());
    assert!(rig.store.snapshot(&g.message_id).unwrap().is_active());

    rig.store.fail_participant_reads(false);
    assert_eq!(
        rig.engine.resolve_expired().await?,
        vec![Resolution::Drawn { message_id: g.message_id.clone(), winners: vec!["alice".into()] }]
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Guess games
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_guess_scenario_hint_then_win() -> Result<(), Error> {
    let rig = TestRig::new(T0);
    let (card_id, thread_id) = start_guess(&rig, "42", guess_request(true, Some("15s"), None)).await;

    let intro = rig.surface.posts_in(&thread_id);
    assert_eq!(intro.len(), 1);
    assert!(intro[0].contains("Start Guessing"));
    assert!(!rig.surface.last_card(&card_id).unwrap().description.contains("42"));

    let outcome = rig.engine.handle_guess(guess(&thread_id, "g1", "alice", "10")).await?;
    assert_eq!(outcome, GuessOutcome::Higher);
    assert_eq!(rig.surface.reactions_on("g1"), vec![Reaction::Higher]);

    rig.clock.advance_ms(15_000);
    let outcome = rig.engine.handle_guess(guess(&thread_id, "g2", "alice", "42")).await?;
    assert_eq!(outcome, GuessOutcome::Won);

    assert!(!rig.engine.index().contains(&thread_id));
    assert_eq!(rig.store.snapshot(&card_id).unwrap().status, GiveawayStatus::Ended);
    assert_eq!(
        rig.surface.count(|c| matches!(c, SurfaceCall::ArchiveThread { thread_id: t } if t == &thread_id)),
        1
    );
    let card = rig.surface.last_card(&card_id).unwrap();
    assert!(card.description.contains("<@alice>"));
    assert!(card.description.contains("42"));
    let posts = rig.surface.posts_in(&thread_id);
    assert!(posts.last().unwrap().contains("<@alice>"));
    Ok(())
}

#[tokio::test]
async fn test_hint_direction_and_miss_reaction() -> Result<(), Error> {
    let rig = TestRig::new(T0);
    let (_, hinted) = start_guess(&rig, "-5", guess_request(true, Some("15s"), None)).await;

    assert_eq!(
        rig.engine.handle_guess(guess(&hinted, "h1", "alice", "0")).await?,
        GuessOutcome::Lower
    );
    assert_eq!(
        rig.engine.handle_guess(guess(&hinted, "h2", "bob", "-100")).await?,
        GuessOutcome::Higher
    );

    let (_, plain) = start_guess(&rig, "7", guess_request(false, None, None)).await;
    assert_eq!(
        rig.engine.handle_guess(guess(&plain, "p1", "alice", "8")).await?,
        GuessOutcome::Miss
    );
    assert_eq!(rig.surface.reactions_on("p1"), vec![Reaction::Miss]);
    Ok(())
}

#[tokio::test]
async fn test_wrong_guesses_keep_game_active() -> Result<(), Error> {
    let rig = TestRig::new(T0);
    let (card_id, thread_id) = start_guess(&rig, "500", guess_request(false, Some("15s"), None)).await;

    for (i, n) in [1, 499, 501, -500].iter().enumerate() {
        let author = format!("player{i}");
        let outcome = rig
            .engine
            .handle_guess(guess(&thread_id, &format!("m{i}"), &author, &n.to_string()))
            .await?;
        assert_eq!(outcome, GuessOutcome::Miss);
    }
    assert!(rig.engine.index().contains(&thread_id));
    assert!(rig.store.snapshot(&card_id).unwrap().is_active());
    Ok(())
}

#[tokio::test]
async fn test_cooldown_allows_one_evaluated_guess_per_window() -> Result<(), Error> {
    let rig = TestRig::new(T0);
    let (_, thread_id) = start_guess(&rig, "42", guess_request(false, Some("30s"), None)).await;

    assert_eq!(
        rig.engine.handle_guess(guess(&thread_id, "a", "alice", "1")).await?,
        GuessOutcome::Miss
    );
    rig.clock.advance_ms(29_999);
    // even the right number is not evaluated while cooling down
    assert_eq!(
        rig.engine.handle_guess(guess(&thread_id, "b", "alice", "42")).await?,
        GuessOutcome::RateLimited
    );
    assert_eq!(rig.surface.reactions_on("b"), vec![Reaction::Cooldown]);
    assert!(rig.engine.index().contains(&thread_id));

    // other players are unaffected
    assert_eq!(
        rig.engine.handle_guess(guess(&thread_id, "c", "bob", "2")).await?,
        GuessOutcome::Miss
    );

    rig.clock.advance_ms(1);
    assert_eq!(
        rig.engine.handle_guess(guess(&thread_id, "d", "alice", "3")).await?,
        GuessOutcome::Miss
    );
    Ok(())
}

#[tokio::test]
async fn test_concurrent_guesses_from_one_user_evaluate_once() -> Result<(), Error> {
    let rig = TestRig::new(T0);
    let (_, thread_id) = start_guess(&rig, "42", guess_request(false, None, None)).await;

    let mut handles = Vec::new();
    for i in 0..6 {
        let engine = rig.engine.clone();
        let msg = guess(&thread_id, &format!("m{i}"), "alice", "1");
        handles.push(tokio::spawn(async move { engine.handle_guess(msg).await }));
    }
    let mut evaluated = 0;
    let mut limited = 0;
    for h in handles {
        match h.await.unwrap()? {
            GuessOutcome::Miss => evaluated += 1,
            GuessOutcome::RateLimited => limited += 1,
            other => panic!("unexpected outcome {other:?}"),
        }
    }
    assert_eq!((evaluated, limited), (1, 5));
    Ok(())
}

#[tokio::test]
async fn test_reply_feedback_policy() -> Result<(), Error> {
    let rig = TestRig::with_policy(
        T0,
        GiveawayPolicy { rate_limit_feedback: RateLimitFeedback::Reply, ..GiveawayPolicy::default() },
    );
    let (_, thread_id) = start_guess(&rig, "42", guess_request(false, None, None)).await;

    rig.engine.handle_guess(guess(&thread_id, "a", "alice", "1")).await?;
    rig.engine.handle_guess(guess(&thread_id, "b", "alice", "2")).await?;

    assert!(rig.surface.reactions_on("b").is_empty());
    let replies = rig.surface.count(|c| {
        matches!(c, SurfaceCall::ReplyTransient { message_id, content, .. }
            if message_id == "b" && content.contains("1m"))
    });
    assert_eq!(replies, 1);
    Ok(())
}

#[tokio::test]
async fn test_messages_that_are_not_guesses_are_ignored() -> Result<(), Error> {
    let rig = TestRig::new(T0);
    let (_, thread_id) = start_guess(&rig, "42", guess_request(false, None, Some("vip"))).await;

    let mut bot = guess(&thread_id, "b", "bot", "42");
    bot.author_is_bot = true;
    assert_eq!(rig.engine.handle_guess(bot).await?, GuessOutcome::Ignored);

    assert_eq!(
        rig.engine.handle_guess(guess("elsewhere", "x", "alice", "42")).await?,
        GuessOutcome::Ignored
    );

    let mut vip = guess(&thread_id, "t", "alice", "is it 42?");
    vip.member_roles = vec!["vip".into()];
    assert_eq!(rig.engine.handle_guess(vip).await?, GuessOutcome::Ignored);

    // role gate is silent and does not start a cooldown
    assert_eq!(
        rig.engine.handle_guess(guess(&thread_id, "r", "alice", "42")).await?,
        GuessOutcome::Ignored
    );
    assert!(rig.surface.reactions_on("r").is_empty());
    assert!(rig.engine.cooldowns().is_empty());

    let mut vip = guess(&thread_id, "w", "alice", " 42 ");
    vip.member_roles = vec!["vip".into()];
    assert_eq!(rig.engine.handle_guess(vip).await?, GuessOutcome::Won);
    Ok(())
}

#[tokio::test]
async fn test_guess_expiry_reveals_number_and_archives() -> Result<(), Error> {
    let rig = TestRig::new(T0);
    let (card_id, thread_id) = start_guess(&rig, "77", guess_request(false, None, None)).await;
    rig.engine.handle_guess(guess(&thread_id, "a", "alice", "1")).await?;

    rig.clock.advance_ms(10 * MINUTE);
    let resolutions = rig.engine.resolve_expired().await?;
    assert_eq!(
        resolutions,
        vec![Resolution::GuessExpired { message_id: card_id.clone(), secret_number: 77 }]
    );
    assert!(!rig.engine.index().contains(&thread_id));
    assert!(rig.engine.cooldowns().is_empty());
    assert!(rig
        .surface
        .posts_in(&thread_id)
        .contains(&"⏰ Time up! The number was 77.".to_string()));
    assert!(rig.surface.last_card(&card_id).unwrap().description.contains("77"));

    // a late guess is no longer evaluated
    rig.clock.advance_ms(MINUTE);
    assert_eq!(
        rig.engine.handle_guess(guess(&thread_id, "late", "alice", "77")).await?,
        GuessOutcome::Ignored
    );
    Ok(())
}

#[tokio::test]
async fn test_win_and_expiry_resolve_once() -> Result<(), Error> {
    let rig = TestRig::new(T0);
    let (card_id, thread_id) = start_guess(&rig, "42", guess_request(false, None, None)).await;

    rig.clock.advance_ms(10 * MINUTE);
    assert!(rig.engine.resolve_win(&thread_id, "alice").await?);
    assert!(!rig.engine.resolve_win(&thread_id, "bob").await?);
    assert!(rig.engine.resolve_expired().await?.is_empty());

    let g = rig.store.snapshot(&card_id).unwrap();
    assert_eq!(g.status, GiveawayStatus::Ended);
    assert!(rig.engine.expire(g).await?.is_none());
    assert_eq!(rig.surface.count(|c| matches!(c, SurfaceCall::ArchiveThread { .. })), 1);
    Ok(())
}

#[tokio::test]
async fn test_display_failures_do_not_block_resolution() -> Result<(), Error> {
    let rig = TestRig::new(T0);
    let (card_id, thread_id) = start_guess(&rig, "42", guess_request(false, None, None)).await;
    let classic = rig.engine.create_classic(classic("3m", 1, None)).await?;
    rig.engine.join(join(&classic.message_id, "alice", &[])).await?;

    for op in [SurfaceOp::Update, SurfaceOp::Post, SurfaceOp::ArchiveThread] {
        rig.surface.fail(op);
    }
    rig.clock.advance_ms(10 * MINUTE);
    let resolutions = rig.engine.resolve_expired().await?;
    assert_eq!(resolutions.len(), 2);
    assert!(!rig.store.snapshot(&card_id).unwrap().is_active());
    assert!(!rig.store.snapshot(&classic.message_id).unwrap().is_active());
    assert!(!rig.engine.index().contains(&thread_id));

    // nothing left to retry on the next poll
    assert!(rig.engine.resolve_expired().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_guess_creation_validation_and_pending_flow() -> Result<(), Error> {
    let rig = TestRig::new(T0);
    assert!(matches!(
        rig.engine.begin_guess(guess_request(false, Some("5s"), None)),
        Err(Error::InvalidCooldown(_))
    ));
    assert!(matches!(
        rig.engine.begin_guess(guess_request(false, Some("whenever"), None)),
        Err(Error::InvalidCooldown(_))
    ));
    assert!(rig.engine.pending().is_empty());

    // no pending creation: silent no-op
    assert_eq!(rig.engine.complete_guess("organizer", "42").await?, None);

    assert_ok!(rig.engine.begin_guess(guess_request(false, None, None)));
    assert!(matches!(
        rig.engine.complete_guess("organizer", "forty-two").await,
        Err(Error::InvalidSecretNumber(_))
    ));
    // a bad number leaves the prompt pending
    assert_eq!(rig.engine.pending().len(), 1);

    let g = rig.engine.complete_guess("organizer", "42").await?.expect("created");
    match &g.type_data {
        TypeData::Guess { secret_number, cooldown_ms, hints_enabled, .. } => {
            assert_eq!(*secret_number, 42);
            assert_eq!(*cooldown_ms, 60_000);
            assert!(!*hints_enabled);
        }
        other => panic!("unexpected type data {other:?}"),
    }
    assert_eq!(g.image_url.as_deref(), Some("https://cdn.example/key.png"));

    // duplicate submission
    assert_eq!(rig.engine.complete_guess("organizer", "42").await?, None);
    assert_eq!(rig.store.giveaway_count(), 1);

    let thread_names: Vec<String> = rig
        .surface
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            SurfaceCall::OpenThread { name, .. } => Some(name),
            _ => None,
        })
        .collect();
    assert_eq!(thread_names, vec!["Guess: Steam key".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_abandoned_prompts_are_swept() {
    let rig = TestRig::new(T0);
    rig.engine.begin_guess(guess_request(false, None, None)).unwrap();

    rig.clock.advance_ms(14 * MINUTE);
    assert_eq!(rig.engine.sweep_volatile(MINUTE, 15 * MINUTE), (0, 0));
    rig.clock.advance_ms(MINUTE);
    assert_eq!(rig.engine.sweep_volatile(MINUTE, 15 * MINUTE), (0, 1));
    assert!(rig.engine.complete_guess("organizer", "1").await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Edit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_edit_prize_and_duration_rerenders_card() -> Result<(), Error> {
    let rig = TestRig::new(T0);
    let g = rig.engine.create_classic(classic("1h", 1, None)).await?;
    rig.engine.join(join(&g.message_id, "alice", &[])).await?;

    rig.clock.advance_ms(10 * MINUTE);
    let outcome = rig
        .engine
        .edit(EditRequest {
            message_id: g.message_id.clone(),
            new_prize: Some("Nitro (1 year)".into()),
            new_duration: Some("2h".into()),
        })
        .await?;
    assert!(outcome.display_error.is_none());
    assert_eq!(outcome.giveaway.prize, "Nitro (1 year)");
    assert_eq!(outcome.giveaway.end_timestamp, T0 + 10 * MINUTE + 120 * MINUTE);

    let card = rig.surface.last_card(&g.message_id).unwrap();
    assert_eq!(card.title, "🎉 **GIVEAWAY: Nitro (1 year)**");
    assert!(card.description.contains("**Entries:** 1"));
    assert!(card.join_button);
    Ok(())
}

#[tokio::test]
async fn test_edit_on_ended_giveaway_changes_nothing() -> Result<(), Error> {
    let rig = TestRig::new(T0);
    let g = rig.engine.create_classic(classic("3m", 1, None)).await?;
    rig.clock.advance_ms(3 * MINUTE);
    rig.engine.resolve_expired().await?;
    let before = rig.store.snapshot(&g.message_id).unwrap();
    rig.surface.clear();

    let err = rig
        .engine
        .edit(EditRequest {
            message_id: g.message_id.clone(),
            new_prize: None,
            new_duration: Some("1h".into()),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AlreadyEnded(_)));
    assert_eq!(rig.store.snapshot(&g.message_id).unwrap(), before);
    assert!(rig.surface.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_edit_validation() -> Result<(), Error> {
    let rig = TestRig::new(T0);
    let g = rig.engine.create_classic(classic("1h", 1, None)).await?;

    let nothing = EditRequest { message_id: g.message_id.clone(), new_prize: Some("   ".into()), new_duration: None };
    assert!(matches!(rig.engine.edit(nothing).await, Err(Error::NothingToUpdate)));

    let short = EditRequest { message_id: g.message_id.clone(), new_prize: None, new_duration: Some("30s".into()) };
    assert!(matches!(rig.engine.edit(short).await, Err(Error::DurationTooShort { .. })));

    let missing = EditRequest { message_id: "missing".into(), new_prize: Some("x".into()), new_duration: None };
    assert!(matches!(rig.engine.edit(missing).await, Err(Error::NotFound(_))));

    let long = EditRequest { message_id: g.message_id.clone(), new_prize: Some("x".repeat(MAX_PRIZE_CHARS + 1)), new_duration: None };
    assert!(matches!(rig.engine.edit(long).await, Err(Error::PrizeTooLong { .. })));
    let far = EditRequest { message_id: g.message_id.clone(), new_prize: None, new_duration: Some("400d".into()) };
    assert!(matches!(rig.engine.edit(far).await, Err(Error::DurationTooLong { .. })));
    assert_eq!(rig.store.snapshot(&g.message_id).unwrap().prize, "Nitro");
    Ok(())
}

#[tokio::test]
async fn test_edit_guess_updates_index_and_reports_display_failure() -> Result<(), Error> {
    let rig = TestRig::new(T0);
    let (card_id, thread_id) = start_guess(&rig, "42", guess_request(false, None, None)).await;
    rig.surface.fail(SurfaceOp::Update);

    let outcome = rig
        .engine
        .edit(EditRequest {
            message_id: card_id.clone(),
            new_prize: Some("Two Steam keys".into()),
            new_duration: Some("1d".into()),
        })
        .await?;
    assert!(matches!(outcome.display_error, Some(Error::DisplaySync(_))));
    assert_eq!(rig.store.snapshot(&card_id).unwrap().prize, "Two Steam keys");

    let game = rig.engine.index().get(&thread_id).unwrap();
    assert_eq!(game.prize, "Two Steam keys");
    assert_eq!(game.end_timestamp, T0 + 24 * 60 * MINUTE);
    Ok(())
}

// ---------------------------------------------------------------------------
// Startup
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_rebuild_index_reproduces_active_games() -> Result<(), Error> {
    let rig = TestRig::new(T0);
    let (card_id, thread_id) =
        start_guess(&rig, "-13", guess_request(true, Some("45s"), Some("vip"))).await;
    let (_, ended_thread) = start_guess(&rig, "1", guess_request(false, None, None)).await;
    rig.engine.resolve_win(&ended_thread, "alice").await?;
    rig.engine.create_classic(classic("1h", 1, None)).await?;

    let before: ActiveGame = rig.engine.index().get(&thread_id).unwrap();
    rig.engine.index().clear();

    assert_eq!(rig.engine.rebuild_index().await?, 1);
    let after = rig.engine.index().get(&thread_id).unwrap();
    assert_eq!(after, before);
    assert_eq!(after.message_id, card_id);
    assert_eq!(after.secret_number, -13);
    assert_eq!(after.required_role_id.as_deref(), Some("vip"));
    assert_eq!(after.cooldown_ms, 45_000);
    assert!(after.hints_enabled);
    Ok(())
}

#[tokio::test]
async fn test_store_rows_drive_index_rebuild() -> Result<(), Error> {
    let rig = TestRig::new(T0);
    let (card_id, _) = start_guess(&rig, "9", guess_request(false, None, None)).await;

    let rows = rig.store.list_active_guess().await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].message_id, card_id);
    assert!(rig.store.mark_ended(&card_id).await?);
    assert!(!rig.store.mark_ended(&card_id).await?);
    assert_eq!(rig.engine.rebuild_index().await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_independent_engines_do_not_share_state() -> Result<(), Error> {
    let a = TestRig::new(T0);
    let b = TestRig::new(T0);
    let (_, thread_a) = start_guess(&a, "42", guess_request(false, None, None)).await;

    assert!(a.engine.index().contains(&thread_a));
    assert!(b.engine.index().is_empty());
    assert_eq!(
        b.engine.handle_guess(guess(&thread_a, "x", "alice", "42")).await?,
        GuessOutcome::Ignored
    );
    Ok(())
}
