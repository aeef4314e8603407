//! Diplomacy meetings - schedules rounds of small-group meetings between players
//!
//! Players name up to three partners they want to meet. Only mutual choices
//! are kept; each meeting slot is then filled by letting the player most in
//! need of a meeting pick one of their remaining partners, until the rest
//! can share a single room.

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod interactive;
pub mod parser;
pub mod schedule;
pub mod web;

pub use config::Settings;
pub use error::{AppError, PreferenceRule, ScheduleError};
pub use schedule::{
    plan_meetings, DecisionSource, FirstCandidate, FirstTied, Group, MeetingPlan, MeetingSlot,
    PlayerDirectory, PlayerInput, RandomTieBreak, RawCities, RoundMatcher, Schedule, ScheduleBuilder,
    ScriptedDecisions, TieBreaker,
};
