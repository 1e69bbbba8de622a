// ================================================================
// File: prizebot-common/src/error.rs
// ================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    // Infrastructure:
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Parse error: {0}")]
    Parse(String),

    // Giveaway rules and user input:
    #[error("Invalid duration: \"{0}\"")]
    InvalidDuration(String),

    #[error("Duration is too short (minimum {min_ms} ms)")]
    DurationTooShort { min_ms: i64 },

    #[error("Duration is too long (maximum {max_ms} ms)")]
    DurationTooLong { max_ms: i64 },

    #[error("Prize is too long (maximum {max_chars} characters)")]
    PrizeTooLong { max_chars: usize },

    #[error("Invalid secret number: \"{0}\"")]
    InvalidSecretNumber(String),

    #[error("Invalid cooldown: \"{0}\"")]
    InvalidCooldown(String),

    #[error("Invalid winner count: {0}")]
    InvalidWinnerCount(i64),

    #[error("Not found error: {0}")]
    NotFound(String),

    #[error("Giveaway {0} has already ended")]
    AlreadyEnded(String),

    #[error("Role {0} is required")]
    RoleRequired(String),

    #[error("Already joined")]
    AlreadyJoined,

    #[error("Nothing to update")]
    NothingToUpdate,

    #[error("Display sync failure: {0}")]
    DisplaySync(String),
}

impl Error {
    /// True for errors caused by the invoking user (bad input, rule violations)
    /// rather than by the store or the platform.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::InvalidDuration(_)
                | Error::DurationTooShort { .. }
                | Error::DurationTooLong { .. }
                | Error::PrizeTooLong { .. }
                | Error::InvalidSecretNumber(_)
                | Error::InvalidCooldown(_)
                | Error::InvalidWinnerCount(_)
                | Error::NotFound(_)
                | Error::AlreadyEnded(_)
                | Error::RoleRequired(_)
                | Error::AlreadyJoined
                | Error::NothingToUpdate
        )
    }

    /// Text for the private reply sent back to the invoking user.
    pub fn user_message(&self) -> String {
        match self {
            Error::InvalidDuration(raw) => format!("Invalid duration: \"{raw}\""),
            Error::DurationTooShort { min_ms } => {
                format!("Duration must be at least {} seconds.", min_ms / 1000)
            }
            Error::DurationTooLong { max_ms } => {
                format!("Duration must be at most {} days.", max_ms / 86_400_000)
            }
            Error::PrizeTooLong { max_chars } => {
                format!("Reward must be at most {max_chars} characters.")
            }
            Error::InvalidSecretNumber(_) => "Invalid number.".to_string(),
            Error::InvalidCooldown(raw) => {
                format!("Invalid cooldown: \"{raw}\" (minimum is 15s).")
            }
            Error::InvalidWinnerCount(n) => format!("Winner count must be at least 1 (got {n})."),
            Error::NotFound(_) => "Giveaway not found.".to_string(),
            Error::AlreadyEnded(_) => "This giveaway has ended.".to_string(),
            Error::RoleRequired(role_id) => format!("You need the <@&{role_id}> role to join."),
            Error::AlreadyJoined => "You are already in this giveaway.".to_string(),
            Error::NothingToUpdate => "Nothing to update: supply a new reward or a new duration.".to_string(),
            Error::DisplaySync(_) => {
                "Giveaway updated, but the giveaway message could not be refreshed.".to_string()
            }
            _ => "Something went wrong while handling that request.".to_string(),
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Parse(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Parse(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_split() {
        assert!(Error::AlreadyEnded("1".into()).is_user_facing());
        assert!(Error::RoleRequired("2".into()).is_user_facing());
        assert!(!Error::Platform("boom".into()).is_user_facing());
        assert!(!Error::DisplaySync("gone".into()).is_user_facing());
        assert!(Error::PrizeTooLong { max_chars: 200 }.is_user_facing());
        assert!(Error::DurationTooLong { max_ms: 0 }.is_user_facing());
    }

    #[test]
    fn test_role_required_mentions_role() {
        let msg = Error::RoleRequired("555".into()).user_message();
        assert_eq!(msg, "You need the <@&555> role to join.");
    }

    #[test]
    fn test_limit_messages() {
        let too_long = Error::DurationTooLong { max_ms: 365 * 86_400_000 };
        assert_eq!(too_long.user_message(), "Duration must be at most 365 days.");
        let prize = Error::PrizeTooLong { max_chars: 200 };
        assert_eq!(prize.user_message(), "Reward must be at most 200 characters.");
    }
}
