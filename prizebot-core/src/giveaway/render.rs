// File: prizebot-core/src/giveaway/render.rs
//
// Cards and announcement texts, always rebuilt from the stored giveaway.

use prizebot_common::models::{Giveaway, TypeData};

use crate::giveaway::duration::format_duration;
use crate::giveaway::surface::GiveawayCard;

pub const COLOR_CLASSIC: u32 = 0x0099FF;
pub const COLOR_GUESS: u32 = 0xFFD700;
pub const COLOR_WON: u32 = 0x00FF00;
pub const COLOR_NO_WINNER: u32 = 0xFF0000;

/// Winner mentions shown on an ended card before the rest are summarised.
pub const MAX_CARD_MENTIONS: usize = 50;
/// Discord's limit on plain message content.
pub const MAX_MESSAGE_CHARS: usize = 2000;

fn relative_time(epoch_ms: i64) -> String {
    format!("<t:{}:R>", epoch_ms.div_euclid(1000))
}

fn role_line(role_id: Option<&str>) -> String {
    match role_id {
        Some(id) => format!("<@&{id}>"),
        None => "None".to_string(),
    }
}

pub fn mention_list(user_ids: &[String]) -> String {
    user_ids
        .iter()
        .map(|id| format!("<@{id}>"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Like `mention_list`, but lists at most `max` users and counts the rest.
pub fn capped_mention_list(user_ids: &[String], max: usize) -> String {
    if user_ids.len() <= max {
        return mention_list(user_ids);
    }
    format!(
        "{} … and {} more",
        mention_list(&user_ids[..max]),
        user_ids.len() - max
    )
}

fn classic_title(g: &Giveaway) -> String {
    format!("🎉 **GIVEAWAY: {}**", g.prize)
}

fn guess_title(g: &Giveaway) -> String {
    format!("🔢 **Guess the Number: {}**", g.prize)
}

/// Classic card while entries are open.
pub fn classic_active(g: &Giveaway, participants: i64) -> GiveawayCard {
    let winner_count = match &g.type_data {
        TypeData::Classic { winner_count, .. } => *winner_count,
        TypeData::Guess { .. } => 1,
    };
    GiveawayCard {
        title: classic_title(g),
        description: format!(
            "Click the button below to enter!\n\n**Winners:** {}\n**Entries:** {}\n**Ends:** {}\n**Required Role:** {}",
            winner_count,
            participants,
            relative_time(g.end_timestamp),
            role_line(g.required_role_id()),
        ),
        color: COLOR_CLASSIC,
        image_url: g.image_url.clone(),
        footer: Some("Ends at".to_string()),
        timestamp_ms: Some(g.end_timestamp),
        join_button: true,
    }
}

/// Classic card after the draw.
pub fn classic_drawn(g: &Giveaway, winners: &[String]) -> GiveawayCard {
    GiveawayCard {
        title: classic_title(g),
        description: format!(
            "🎉 **WINNERS:** {}\n\n**Prize:** {}",
            capped_mention_list(winners, MAX_CARD_MENTIONS),
            g.prize
        ),
        color: COLOR_WON,
        image_url: g.image_url.clone(),
        footer: Some("Giveaway Ended".to_string()),
        timestamp_ms: None,
        join_button: false,
    }
}

/// Classic card when nobody entered.
pub fn classic_empty(g: &Giveaway) -> GiveawayCard {
    GiveawayCard {
        title: classic_title(g),
        description: format!("❌ No one joined the giveaway.\n\n**Prize:** {}", g.prize),
        color: COLOR_NO_WINNER,
        image_url: g.image_url.clone(),
        footer: Some("Giveaway Ended".to_string()),
        timestamp_ms: None,
        join_button: false,
    }
}

/// Guess card while the game runs. Never shows the secret number.
pub fn guess_active(g: &Giveaway) -> GiveawayCard {
    let (hints, cooldown_ms) = match &g.type_data {
        TypeData::Guess { hints_enabled, cooldown_ms, .. } => (*hints_enabled, *cooldown_ms),
        TypeData::Classic { .. } => (false, 0),
    };
    GiveawayCard {
        title: guess_title(g),
        description: format!(
            "Guess the secret number in the thread!\n\n**Ends:** {}\n**Required Role:** {}\n**Cooldown:** {}\n**Hints:** {}",
            relative_time(g.end_timestamp),
            role_line(g.required_role_id()),
            format_duration(cooldown_ms),
            if hints { "On" } else { "Off" },
        ),
        color: COLOR_GUESS,
        image_url: g.image_url.clone(),
        footer: Some("Ends at".to_string()),
        timestamp_ms: Some(g.end_timestamp),
        join_button: false,
    }
}

pub fn guess_won(g: &Giveaway, winner_id: &str, secret_number: i64) -> GiveawayCard {
    GiveawayCard {
        title: guess_title(g),
        description: format!(
            "**WINNER:** <@{winner_id}>\n**Prize:** {}\n**Number:** {secret_number}",
            g.prize
        ),
        color: COLOR_WON,
        image_url: g.image_url.clone(),
        footer: Some("Giveaway Ended".to_string()),
        timestamp_ms: None,
        join_button: false,
    }
}

pub fn guess_expired(g: &Giveaway, secret_number: i64) -> GiveawayCard {
    GiveawayCard {
        title: guess_title(g),
        description: format!("❌ **Expired:** No one guessed the number ({secret_number})."),
        color: COLOR_NO_WINNER,
        image_url: g.image_url.clone(),
        footer: Some("Giveaway Ended".to_string()),
        timestamp_ms: None,
        join_button: false,
    }
}

pub fn guess_intro(cooldown_ms: i64, hints_enabled: bool) -> String {
    let hints = if hints_enabled {
        "\nHints are on: ⬆️ means the number is higher, ⬇️ means lower."
    } else {
        ""
    };
    format!("**Start Guessing!**\nCooldown: {}.{hints}", format_duration(cooldown_ms))
}

pub fn guess_win_announcement(winner_id: &str, secret_number: i64) -> String {
    format!("🎉 **WINNER:** <@{winner_id}> guessed {secret_number}!")
}

pub fn guess_expired_announcement(secret_number: i64) -> String {
    format!("⏰ Time up! The number was {secret_number}.")
}

/// Winner announcement for a classic draw. Long winner lists are split over
/// several messages, each within `MAX_MESSAGE_CHARS`.
pub fn classic_announcements(winners: &[String], prize: &str) -> Vec<String> {
    let single = format!("Congratulations {}! You won **{prize}**!", mention_list(winners));
    if single.chars().count() <= MAX_MESSAGE_CHARS {
        return vec![single];
    }

    let mut messages = vec![format!(
        "Congratulations to all {} winners! You won **{prize}**!",
        winners.len()
    )];
    let mut current = String::new();
    for id in winners {
        let mention = format!("<@{id}>");
        if !current.is_empty()
            && current.chars().count() + 2 + mention.chars().count() > MAX_MESSAGE_CHARS
        {
            messages.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push_str(", ");
        }
        current.push_str(&mention);
    }
    if !current.is_empty() {
        messages.push(current);
    }
    messages
}

pub fn cooldown_notice(cooldown_ms: i64) -> String {
    format!("⏳ Please wait {}.", format_duration(cooldown_ms))
}
