use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::RosterSettings;
use crate::error::{PreferenceRule, ScheduleError};
use super::types::Player;

/// Number of cities as it arrives from an input source, before validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCities {
    Integer(i64),
    /// Only reached for integers above `i64::MAX`
    Unsigned(u64),
    Float(f64),
    Text(String),
    /// Anything else: booleans, null, lists, objects
    Other(Value),
}

impl From<u32> for RawCities {
    fn from(value: u32) -> Self {
        RawCities::Integer(value as i64)
    }
}

impl From<&str> for RawCities {
    fn from(value: &str) -> Self {
        RawCities::Text(value.to_string())
    }
}

/// Unvalidated data for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    pub name: String,
    pub choices: Vec<String>,
    pub num_cities: RawCities,
}

impl PlayerInput {
    pub fn new(name: impl Into<String>, choices: &[&str], num_cities: impl Into<RawCities>) -> Self {
        Self {
            name: name.into(),
            choices: choices.iter().map(|c| c.to_string()).collect(),
            num_cities: num_cities.into(),
        }
    }
}

/// Checks the roster size against the configured bounds
pub fn validate_player_count(count: usize, rules: &RosterSettings) -> Result<(), ScheduleError> {
    if count < rules.min_players || count > rules.max_players {
        return Err(ScheduleError::InvalidParticipantCount {
            count,
            min: rules.min_players,
            max: rules.max_players,
        });
    }
    Ok(())
}

/// Checks one player's choices against the roster
pub fn validate_choices<S: AsRef<str>>(
    player: &str,
    choices: &[String],
    roster: &[S],
    max_choices: usize,
) -> Result<(), ScheduleError> {
    let fail = |rule| ScheduleError::InvalidPreference {
        player: player.to_string(),
        rule,
    };

    if choices.len() > max_choices {
        return Err(fail(PreferenceRule::TooMany { max: max_choices }));
    }

    let mut seen = HashSet::new();
    for choice in choices {
        if !seen.insert(choice.as_str()) {
            return Err(fail(PreferenceRule::Duplicate(choice.clone())));
        }
    }

    if choices.iter().any(|c| c == player) {
        return Err(fail(PreferenceRule::SelfReference));
    }

    if let Some(unknown) = choices.iter().find(|c| !roster.iter().any(|r| r.as_ref() == c.as_str())) {
        return Err(fail(PreferenceRule::UnknownPlayer(unknown.clone())));
    }

    Ok(())
}

/// Converts a raw city count into a non-negative integer within the domain maximum
pub fn parse_num_cities(player: &str, raw: &RawCities, max_num_cities: u32) -> Result<u32, ScheduleError> {
    let fail = |value: String, reason: &str| ScheduleError::InvalidResourceCount {
        player: player.to_string(),
        value,
        reason: reason.to_string(),
    };

    let value = match raw {
        RawCities::Integer(n) if *n < 0 => return Err(fail(n.to_string(), "negative integer entered")),
        RawCities::Integer(n) => u32::try_from(*n).map_err(|_| fail(n.to_string(), "number too large"))?,
        RawCities::Unsigned(n) => u32::try_from(*n).map_err(|_| fail(n.to_string(), "number too large"))?,
        RawCities::Float(f) => return Err(fail(f.to_string(), "integer not entered")),
        RawCities::Other(value) => return Err(fail(value.to_string(), "integer not entered")),
        RawCities::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
                return Err(fail(text.clone(), "integer not entered"));
            }
            trimmed
                .parse::<u32>()
                .map_err(|_| fail(text.clone(), "number too large"))?
        }
    };

    if value > max_num_cities {
        return Err(fail(
            value.to_string(),
            &format!("more than the maximum of {} cities", max_num_cities),
        ));
    }

    Ok(value)
}

/// All players keyed by name, in roster order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerDirectory {
    players: Vec<Player>,
}

impl PlayerDirectory {
    /// Validates every player and builds the directory. Choices are not narrowed yet.
    pub fn build(inputs: Vec<PlayerInput>, rules: &RosterSettings) -> Result<Self, ScheduleError> {
        validate_player_count(inputs.len(), rules)?;

        let mut names = HashSet::new();
        for input in &inputs {
            if !names.insert(input.name.as_str()) {
                return Err(ScheduleError::DuplicatePlayer {
                    name: input.name.clone(),
                });
            }
        }

        let roster: Vec<&str> = inputs.iter().map(|i| i.name.as_str()).collect();
        let mut players = Vec::with_capacity(inputs.len());
        for input in &inputs {
            validate_choices(&input.name, &input.choices, roster.as_slice(), rules.max_choices)?;
            let num_cities = parse_num_cities(&input.name, &input.num_cities, rules.max_num_cities)?;
            players.push(Player::new(input.name.clone(), num_cities, input.choices.clone()));
        }

        Ok(Self { players })
    }

    /// Builds a directory from players that were validated elsewhere
    pub fn from_players(players: Vec<Player>) -> Self {
        Self { players }
    }

    /// Drops every choice that is not returned by the chosen player.
    ///
    /// Evaluated against a snapshot of the choices taken before any removal,
    /// so the result does not depend on player order.
    pub fn narrow_to_mutual(&mut self) {
        let snapshot: HashMap<String, Vec<String>> = self
            .players
            .iter()
            .map(|p| (p.name.clone(), p.choices.clone()))
            .collect();

        for player in &mut self.players {
            let before = player.choices.len();
            player.choices.retain(|choice| {
                snapshot
                    .get(choice)
                    .map_or(false, |theirs| theirs.contains(&player.name))
            });
            if player.choices.len() != before {
                debug!(
                    player = %player.name,
                    removed = before - player.choices.len(),
                    "Dropped one-sided choices"
                );
            }
        }
    }

    /// True when every remaining choice is returned
    pub fn is_mutual(&self) -> bool {
        self.players.iter().all(|p| {
            p.choices.iter().all(|choice| {
                self.get(choice)
                    .map_or(false, |other| other.choices.contains(&p.name))
            })
        })
    }

    /// Removes the pairing from both players' remaining choices
    pub fn consume_pair(&mut self, a: &str, b: &str) {
        if let Some(player) = self.get_mut(a) {
            player.choices.retain(|c| c != b);
        }
        if let Some(player) = self.get_mut(b) {
            player.choices.retain(|c| c != a);
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.players.iter().map(|p| p.name.clone()).collect()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn get(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
