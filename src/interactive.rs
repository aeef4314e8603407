use std::io::{self, BufRead, Write};

use tracing::warn;

use crate::config::RosterSettings;
use crate::error::{Result, ScheduleError};
use crate::parser::split_names;
use crate::schedule::directory::{parse_num_cities, validate_choices, validate_player_count};
use crate::schedule::{DecisionSource, PlayerInput, RawCities};

/// Reads one line, `None` at end of input
fn read_answer<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn end_of_input(player: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("input ended while reading {}'s answers", player),
    )
}

/// Asks for a player's choices until they pass validation
pub fn prompt_choices<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    player: &str,
    roster: &[String],
    max_choices: usize,
) -> io::Result<Vec<String>> {
    loop {
        write!(output, "Enter {}'s choices: ", player)?;
        output.flush()?;

        let answer = read_answer(input)?.ok_or_else(|| end_of_input(player))?;
        let choices = split_names(&answer.replace(' ', ""));
        match validate_choices(player, &choices, roster, max_choices) {
            Ok(()) => return Ok(choices),
            Err(e) => writeln!(output, "Player Input Error: {}. Try again.", e)?,
        }
    }
}

/// Asks for a player's number of cities until it is a valid count
pub fn prompt_num_cities<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    player: &str,
    max_num_cities: u32,
) -> io::Result<u32> {
    loop {
        write!(output, "Enter {}'s number of cities: ", player)?;
        output.flush()?;

        let answer = read_answer(input)?.ok_or_else(|| end_of_input(player))?;
        match parse_num_cities(player, &RawCities::Text(answer), max_num_cities) {
            Ok(n) => return Ok(n),
            Err(e) => writeln!(output, "Player Input Error: {}. Try again.", e)?,
        }
    }
}

/// Collects choices and city counts for players named on the command line
pub fn collect_players<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    names: &[String],
    rules: &RosterSettings,
) -> Result<Vec<PlayerInput>> {
    validate_player_count(names.len(), rules)?;
    if let Some((_, dup)) = names.iter().enumerate().find(|(i, n)| names[..*i].contains(n)) {
        return Err(ScheduleError::DuplicatePlayer { name: dup.clone() }.into());
    }

    let mut players = Vec::with_capacity(names.len());
    for name in names {
        let choices = prompt_choices(input, output, name, names, rules.max_choices)?;
        let num_cities = prompt_num_cities(input, output, name, rules.max_num_cities)?;
        players.push(PlayerInput {
            name: name.clone(),
            choices,
            num_cities: RawCities::Integer(i64::from(num_cities)),
        });
    }
    Ok(players)
}

/// Asks the chooser at the terminal who they want to meet
pub struct TerminalDecisions<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalDecisions<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, chooser: &str, candidates: &[String]) -> io::Result<Option<String>> {
        writeln!(self.output, "\n{}, who would you like to meet with?", chooser)?;
        writeln!(self.output, "Options: {:?}", candidates)?;
        write!(self.output, "Choice: ")?;
        self.output.flush()?;
        read_answer(&mut self.input)
    }
}

impl<R: BufRead, W: Write> DecisionSource for TerminalDecisions<R, W> {
    fn choose(&mut self, chooser: &str, candidates: &[String]) -> String {
        match self.ask(chooser, candidates) {
            Ok(Some(answer)) => answer,
            Ok(None) => {
                warn!("No more input, {} takes {}", chooser, candidates[0]);
                candidates[0].clone()
            }
            Err(e) => {
                warn!(error = %e, "Could not read choice, {} takes {}", chooser, candidates[0]);
                candidates[0].clone()
            }
        }
    }

    fn rejected(&mut self, error: &ScheduleError) {
        let _ = writeln!(self.output, "Player Input Error: {}. Try again.", error);
    }
}
