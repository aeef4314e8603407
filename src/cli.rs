use std::path::PathBuf;

use crate::config::MAX_MEETINGS;
use crate::error::{AppError, Result};

pub const USAGE: &str = "\
Usage:
  diplomacy-meetings (--players NAME... | --json FILE | --csv FILE) [options]
  diplomacy-meetings web [PORT]

Options:
  -p, --players NAME...   Player names; choices and cities are asked for interactively
  -j, --json FILE         JSON file mapping names to {\"choices\": [...], \"num_cities\": N}
  -c, --csv FILE          CSV file with name, num_cities and choices columns
  -s, --seed N            Seed for tie-breaks, makes the schedule reproducible
  -m, --meetings N        Number of meeting slots (default from config, 3)
  -o, --out FILE          Also write the schedule to a text file
      --csv-out FILE      Also export the schedule as CSV
      --config FILE       Read settings from FILE instead of config/
  -h, --help              Show this message";

/// Where player data comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Players(Vec<String>),
    Json(PathBuf),
    Csv(PathBuf),
}

/// Options for a scheduling run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub input: InputSource,
    pub seed: Option<u64>,
    pub meetings: Option<usize>,
    pub out: Option<PathBuf>,
    pub csv_out: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Schedule(RunOptions),
    Web { port: Option<u16> },
    Help,
}

fn usage(message: impl Into<String>) -> AppError {
    AppError::Usage(message.into())
}

fn value<I: Iterator<Item = String>>(args: &mut std::iter::Peekable<I>, flag: &str) -> Result<String> {
    args.next()
        .filter(|v| !v.starts_with('-'))
        .ok_or_else(|| usage(format!("{} needs a value", flag)))
}

fn number<T: std::str::FromStr, I: Iterator<Item = String>>(
    args: &mut std::iter::Peekable<I>,
    flag: &str,
) -> Result<T> {
    let raw = value(args, flag)?;
    raw.parse()
        .map_err(|_| usage(format!("{} expects a number, got {}", flag, raw)))
}

/// Parses command line arguments, without the program name
pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Command> {
    let mut args = args.into_iter().peekable();

    if args.peek().map(String::as_str) == Some("web") {
        args.next();
        let port = match args.next() {
            Some(p) => Some(p.parse().map_err(|_| usage(format!("invalid port {}", p)))?),
            None => None,
        };
        return Ok(Command::Web { port });
    }

    let mut players: Option<Vec<String>> = None;
    let mut json = None;
    let mut csv = None;
    let mut seed = None;
    let mut meetings = None;
    let mut out = None;
    let mut csv_out = None;
    let mut config = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-p" | "--players" => {
                let mut names = Vec::new();
                while let Some(name) = args.next_if(|a| !a.starts_with('-')) {
                    names.push(name);
                }
                players = Some(names);
            }
            "-j" | "--json" => json = Some(PathBuf::from(value(&mut args, &arg)?)),
            "-c" | "--csv" => csv = Some(PathBuf::from(value(&mut args, &arg)?)),
            "-s" | "--seed" => seed = Some(number(&mut args, &arg)?),
            "-m" | "--meetings" => {
                let n: usize = number(&mut args, &arg)?;
                if n == 0 || n > MAX_MEETINGS {
                    return Err(usage(format!("--meetings must be between 1 and {}", MAX_MEETINGS)));
                }
                meetings = Some(n);
            }
            "-o" | "--out" => out = Some(PathBuf::from(value(&mut args, &arg)?)),
            "--csv-out" => csv_out = Some(PathBuf::from(value(&mut args, &arg)?)),
            "--config" => config = Some(PathBuf::from(value(&mut args, &arg)?)),
            other => return Err(usage(format!("unknown argument {}", other))),
        }
    }

    let input = match (players, json, csv) {
        (Some(names), None, None) => InputSource::Players(names),
        (None, Some(path), None) => InputSource::Json(path),
        (None, None, Some(path)) => InputSource::Csv(path),
        (None, None, None) => return Err(usage("must enter either --players, --json or --csv")),
        _ => return Err(usage("can only specify one input source: --players, --json or --csv")),
    };

    Ok(Command::Schedule(RunOptions {
        input,
        seed,
        meetings,
        out,
        csv_out,
        config,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Command> {
        parse_args(line.split_whitespace().map(str::to_string))
    }

    fn options(line: &str) -> RunOptions {
        match parse(line).unwrap() {
            Command::Schedule(options) => options,
            other => panic!("expected a scheduling run, got {:?}", other),
        }
    }

    #[test]
    fn test_players_then_flags() {
        let opts = options("--players Anna Bob Cara Dan Eve --seed 42 -m 4");
        assert_eq!(
            opts.input,
            InputSource::Players(vec!["Anna", "Bob", "Cara", "Dan", "Eve"].into_iter().map(String::from).collect())
        );
        assert_eq!(opts.seed, Some(42));
        assert_eq!(opts.meetings, Some(4));
    }

    #[test]
    fn test_json_with_outputs() {
        let opts = options("-j players.json -o schedule.txt --csv-out schedule.csv");
        assert_eq!(opts.input, InputSource::Json(PathBuf::from("players.json")));
        assert_eq!(opts.out, Some(PathBuf::from("schedule.txt")));
        assert_eq!(opts.csv_out, Some(PathBuf::from("schedule.csv")));
    }

    #[test]
    fn test_exactly_one_input_source() {
        assert!(matches!(parse(""), Err(AppError::Usage(_))));
        assert!(matches!(parse("--json a.json --players A B"), Err(AppError::Usage(_))));
    }

    #[test]
    fn test_bad_values() {
        assert!(matches!(parse("--json a.json --seed x"), Err(AppError::Usage(_))));
        assert!(matches!(parse("--json a.json --meetings 0"), Err(AppError::Usage(_))));
        assert!(matches!(parse("--json a.json --meetings 21"), Err(AppError::Usage(_))));
        assert!(matches!(parse("--json"), Err(AppError::Usage(_))));
        assert!(matches!(parse("--json a.json --verbose"), Err(AppError::Usage(_))));
    }

    #[test]
    fn test_web_and_help() {
        assert_eq!(parse("web 9000").unwrap(), Command::Web { port: Some(9000) });
        assert_eq!(parse("web").unwrap(), Command::Web { port: None });
        assert_eq!(parse("--help").unwrap(), Command::Help);
    }
}
