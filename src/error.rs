use std::fmt;

use thiserror::Error;

/// Which structural rule a player's preference list broke
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceRule {
    TooMany { max: usize },
    Duplicate(String),
    SelfReference,
    UnknownPlayer(String),
    NotAList,
}

impl fmt::Display for PreferenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreferenceRule::TooMany { max } => write!(f, "too many choices (at most {} allowed)", max),
            PreferenceRule::Duplicate(name) => write!(f, "player name {} repeated", name),
            PreferenceRule::SelfReference => write!(f, "can't choose yourself"),
            PreferenceRule::UnknownPlayer(name) => write!(f, "player choice {} is unknown", name),
            PreferenceRule::NotAList => write!(f, "choices must be a list of player names"),
        }
    }
}

/// Errors raised while validating input or building a schedule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("must enter between {min} and {max} players, got {count}")]
    InvalidParticipantCount { count: usize, min: usize, max: usize },

    #[error("player {name} entered more than once")]
    DuplicatePlayer { name: String },

    #[error("invalid choices for {player}: {rule}")]
    InvalidPreference { player: String, rule: PreferenceRule },

    #[error("invalid number of cities for {player} ({value}): {reason}")]
    InvalidResourceCount {
        player: String,
        value: String,
        reason: String,
    },

    #[error("{answer} is not one of {chooser}'s possible matches {candidates:?}")]
    InvalidChoice {
        chooser: String,
        answer: String,
        candidates: Vec<String>,
    },

    #[error("meeting slot {round} is not a full partition of the players: {reason}")]
    ScheduleIncomplete { round: usize, reason: String },
}

impl ScheduleError {
    /// Input errors can be fixed by asking again; the rest cannot
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ScheduleError::InvalidParticipantCount { .. }
                | ScheduleError::DuplicatePlayer { .. }
                | ScheduleError::InvalidPreference { .. }
                | ScheduleError::InvalidResourceCount { .. }
                | ScheduleError::InvalidChoice { .. }
        )
    }
}

/// Errors at the program boundary (files, config, command line)
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid CSV input: {0}")]
    Csv(#[from] csv::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("usage error: {0}")]
    Usage(String),
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
