use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Largest group that may form without being an escape group
pub const MAX_GROUP_SIZE: usize = 3;

/// Upper bound on meeting slots per schedule
pub const MAX_MEETINGS: usize = 20;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub meetings: MeetingSettings,
    #[serde(default)]
    pub roster: RosterSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeetingSettings {
    #[serde(default = "default_meeting_count")]
    pub count: usize,
    #[serde(default = "default_max_group_size")]
    pub max_group_size: usize,
}

impl Default for MeetingSettings {
    fn default() -> Self {
        Self {
            count: default_meeting_count(),
            max_group_size: default_max_group_size(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RosterSettings {
    #[serde(default = "default_min_players")]
    pub min_players: usize,
    #[serde(default = "default_max_players")]
    pub max_players: usize,
    #[serde(default = "default_max_choices")]
    pub max_choices: usize,
    #[serde(default = "default_max_num_cities")]
    pub max_num_cities: u32,
}

impl Default for RosterSettings {
    fn default() -> Self {
        Self {
            min_players: default_min_players(),
            max_players: default_max_players(),
            max_choices: default_max_choices(),
            max_num_cities: default_max_num_cities(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingSettings {
    /// Fixed seed for tie-breaks; `None` seeds from entropy
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_meeting_count() -> usize { 3 }
fn default_max_group_size() -> usize { 3 }
fn default_min_players() -> usize { 5 }
fn default_max_players() -> usize { 7 }
fn default_max_choices() -> usize { 3 }
fn default_max_num_cities() -> u32 { 18 }
fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "pretty".to_string() }
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration files (config/default.toml, then config/local.toml)
    /// 3. Environment variables (prefixed with DIPLOMACY__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., DIPLOMACY__MEETINGS__COUNT -> meetings.count
            .add_source(environment())
            .build()?;

        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the scheduler cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.meetings.count == 0 || self.meetings.count > MAX_MEETINGS {
            return Err(ConfigError::Message(format!(
                "meetings.count must be between 1 and {}",
                MAX_MEETINGS
            )));
        }
        if !(2..=MAX_GROUP_SIZE).contains(&self.meetings.max_group_size) {
            return Err(ConfigError::Message(format!(
                "meetings.max_group_size must be between 2 and {}",
                MAX_GROUP_SIZE
            )));
        }
        if self.roster.min_players > self.roster.max_players {
            return Err(ConfigError::Message(format!(
                "roster.min_players ({}) is larger than roster.max_players ({})",
                self.roster.min_players, self.roster.max_players
            )));
        }
        Ok(())
    }
}

fn environment() -> Environment {
    Environment::with_prefix("DIPLOMACY")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
