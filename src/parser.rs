use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{PreferenceRule, Result, ScheduleError};
use crate::schedule::{PlayerInput, RawCities};

/// One player's entry in a JSON roster document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerEntry {
    /// Kept loose so a malformed list is reported against the player
    #[serde(default = "no_choices")]
    pub choices: Value,
    pub num_cities: RawCities,
}

fn no_choices() -> Value {
    Value::Array(Vec::new())
}

/// Roster document: player name -> entry, in document order
pub type RosterDocument = Map<String, Value>;

/// Choice names from a JSON `choices` field, which must be a list of strings
fn choice_names(player: &str, choices: Value) -> Result<Vec<String>, ScheduleError> {
    let not_a_list = || ScheduleError::InvalidPreference {
        player: player.to_string(),
        rule: PreferenceRule::NotAList,
    };

    match choices {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(name) => Ok(name),
                _ => Err(not_a_list()),
            })
            .collect(),
        _ => Err(not_a_list()),
    }
}

/// Converts a parsed roster document into player inputs
pub fn roster_from_document(document: RosterDocument) -> Result<Vec<PlayerInput>> {
    document
        .into_iter()
        .map(|(name, value)| -> Result<PlayerInput> {
            let entry: PlayerEntry = serde_json::from_value(value)?;
            let choices = choice_names(&name, entry.choices)?;
            Ok(PlayerInput {
                name,
                choices,
                num_cities: entry.num_cities,
            })
        })
        .collect()
}

/// Parses a JSON roster like `{"Anna": {"choices": ["Bob"], "num_cities": 3}}`
pub fn parse_roster_json(text: &str) -> Result<Vec<PlayerInput>> {
    let document: RosterDocument = serde_json::from_str(text)?;
    roster_from_document(document)
}

/// Loads a JSON roster from a file
pub fn load_roster_json<P: AsRef<Path>>(json_path: P) -> Result<Vec<PlayerInput>> {
    let mut text = String::new();
    File::open(json_path.as_ref())?.read_to_string(&mut text)?;
    let players = parse_roster_json(&text)?;
    debug!(path = %json_path.as_ref().display(), players = players.len(), "Loaded JSON roster");
    Ok(players)
}

/// Splits a list of names separated by commas or semicolons
pub fn split_names(field: &str) -> Vec<String> {
    field
        .split(|c: char| c == ',' || c == ';')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Column positions of a CSV roster
#[derive(Debug, Clone, PartialEq, Eq)]
struct RosterColumns {
    name: usize,
    cities: usize,
    choices: Vec<usize>,
    /// Fields from here on are unquoted overflow of the choice list
    overflow_from: usize,
}

impl RosterColumns {
    fn from_header(header: &StringRecord) -> Self {
        let header_is = |h: &str, wanted: &str| h.eq_ignore_ascii_case(wanted);

        let name = header.iter().position(|h| header_is(h, "name")).unwrap_or(0);
        let cities = header
            .iter()
            .position(|h| header_is(h, "num_cities") || header_is(h, "cities"))
            .unwrap_or(1);
        let mut choices: Vec<usize> = header
            .iter()
            .enumerate()
            .filter(|(_, h)| h.to_lowercase().starts_with("choice"))
            .map(|(i, _)| i)
            .collect();
        if choices.is_empty() {
            choices.push(2);
        }
        let last_choice = choices.iter().max().copied().unwrap_or(2);

        Self {
            name,
            cities,
            choices,
            overflow_from: header.len().max(last_choice + 1),
        }
    }

    /// `name,num_cities,choice,choice,...` for files without a header row
    fn positional() -> Self {
        Self {
            name: 0,
            cities: 1,
            choices: vec![2],
            overflow_from: 3,
        }
    }

    /// `None` for rows without a name
    fn player(&self, record: &StringRecord) -> Option<PlayerInput> {
        let name = record.get(self.name).unwrap_or("").to_string();
        if name.is_empty() {
            return None;
        }

        let listed = self.choices.iter().filter_map(|&col| record.get(col));
        let overflow = record.iter().skip(self.overflow_from);
        let choices = listed.chain(overflow).flat_map(split_names).collect();
        let num_cities = RawCities::Text(record.get(self.cities).unwrap_or("").to_string());

        Some(PlayerInput { name, choices, num_cities })
    }
}

/// Parses a CSV roster.
///
/// A header row is recognised by its `name` column; the other columns are
/// `num_cities` (or `cities`) and either one `choices` column or several
/// `choiceN` columns. Without a header the columns are taken as
/// `name,num_cities,choices...`.
pub fn parse_roster_csv<R: Read>(reader: R) -> Result<Vec<PlayerInput>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = reader.records();

    let first = match records.next() {
        Some(record) => record?,
        None => return Ok(Vec::new()),
    };

    let has_header = first.iter().any(|h| h.eq_ignore_ascii_case("name"));
    let columns = if has_header {
        RosterColumns::from_header(&first)
    } else {
        debug!("No header row in CSV roster, reading columns by position");
        RosterColumns::positional()
    };

    let mut players = Vec::new();
    if !has_header {
        players.extend(columns.player(&first));
    }
    for result in records {
        let record = result?;
        // Skip blank rows
        players.extend(columns.player(&record));
    }

    Ok(players)
}

/// Loads a CSV roster from a file
pub fn load_roster_csv<P: AsRef<Path>>(csv_path: P) -> Result<Vec<PlayerInput>> {
    let file = File::open(csv_path.as_ref())?;
    let players = parse_roster_csv(file)?;
    debug!(path = %csv_path.as_ref().display(), players = players.len(), "Loaded CSV roster");
    Ok(players)
}
