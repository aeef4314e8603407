use std::io;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use diplomacy_meetings::cli::{self, Command, InputSource, RunOptions};
use diplomacy_meetings::config::{LoggingSettings, Settings};
use diplomacy_meetings::error::AppError;
use diplomacy_meetings::interactive::{self, TerminalDecisions};
use diplomacy_meetings::schedule::{PlayerDirectory, RandomTieBreak, RoundMatcher, ScheduleBuilder};
use diplomacy_meetings::{display, export, parser, web};

#[tokio::main]
async fn main() -> ExitCode {
    let command = match cli::parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}\n\n{}", e, cli::USAGE);
            return ExitCode::from(2);
        }
    };

    let config_path = match &command {
        Command::Schedule(options) => options.config.clone(),
        _ => None,
    };
    let settings = match config_path {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&settings.logging);

    let result = match command {
        Command::Help => {
            println!("{}", cli::USAGE);
            Ok(())
        }
        Command::Web { port } => {
            let port = port.unwrap_or(settings.server.port);
            println!("Starting web server on port {}...", port);
            web::start_server(settings, port).await.map_err(AppError::from)
        }
        Command::Schedule(options) => run_schedule(settings, options),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Scheduling aborted");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so the printed schedule stays clean
fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false);

    if logging.format == "compact" {
        subscriber.compact().init();
    } else {
        subscriber.pretty().init();
    }
}

fn run_schedule(mut settings: Settings, options: RunOptions) -> Result<(), AppError> {
    if let Some(count) = options.meetings {
        settings.meetings.count = count;
    }
    let seed = options.seed.or(settings.matching.seed);

    // Get player info input
    let inputs = match &options.input {
        InputSource::Players(names) => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            interactive::collect_players(&mut stdin.lock(), &mut stdout.lock(), names, &settings.roster)?
        }
        InputSource::Json(path) => parser::load_roster_json(path)?,
        InputSource::Csv(path) => parser::load_roster_csv(path)?,
    };
    info!(players = inputs.len(), "Loaded player information");

    let mut directory = PlayerDirectory::build(inputs, &settings.roster)?;
    directory.narrow_to_mutual();

    println!("\nPlayer information with choices narrowed:");
    display::print_player_directory(&directory)?;

    if let Some(seed) = seed {
        info!(seed, "Using fixed tie-break seed");
    }
    let matcher = RoundMatcher::new(
        TerminalDecisions::new(io::stdin().lock(), io::stdout()),
        RandomTieBreak::from_seed_option(seed),
        settings.meetings.max_group_size,
    );
    let schedule = ScheduleBuilder::new(matcher).build_schedule(&mut directory, settings.meetings.count)?;

    display::print_schedule(&schedule)?;

    for (i, slot) in schedule.iter().enumerate() {
        display::print_stranded(i + 1, slot)?;
    }

    if let Some(path) = &options.out {
        display::write_schedule_to_file(&schedule, path)?;
        println!("Schedule saved to {}", path.display());
    }
    if let Some(path) = &options.csv_out {
        export::export_schedule_to_csv(&schedule, path)?;
        println!("Schedule exported to {}", path.display());
    }

    Ok(())
}
