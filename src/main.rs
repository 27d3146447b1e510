use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use photolens::config::Config;
use photolens::logging;
use photolens::pipeline::{self, RunOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Growth,
    People,
    All,
}

/// A single pipeline; `Command::All` runs both in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pipeline {
    Growth,
    People,
}

#[derive(Debug, Default)]
struct Args {
    command: Option<Command>,
    config_path: Option<PathBuf>,
    db_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    no_anonymize: bool,
    no_charts: bool,
    no_display: bool,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("photolens {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--config" | "-c" => {
                parsed.config_path = Some(PathBuf::from(value_for(&args, i)));
                i += 1;
            }
            "--db" => {
                parsed.db_path = Some(PathBuf::from(value_for(&args, i)));
                i += 1;
            }
            "--output" | "-o" => {
                parsed.output_dir = Some(PathBuf::from(value_for(&args, i)));
                i += 1;
            }
            "--no-anonymize" => parsed.no_anonymize = true,
            "--no-charts" => parsed.no_charts = true,
            "--no-display" => parsed.no_display = true,
            "growth" if parsed.command.is_none() => parsed.command = Some(Command::Growth),
            "people" if parsed.command.is_none() => parsed.command = Some(Command::People),
            "all" if parsed.command.is_none() => parsed.command = Some(Command::All),
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    parsed
}

fn value_for(args: &[String], i: usize) -> &str {
    match args.get(i + 1) {
        Some(value) => value,
        None => {
            eprintln!("Error: {} requires a value", args[i]);
            std::process::exit(1);
        }
    }
}

fn print_help() {
    println!(
        r#"photolens - Photos library growth and people statistics

USAGE:
    photolens [growth|people|all] [OPTIONS]

COMMANDS:
    growth              Storage added per month and cumulative library size
    people              People ranked by photos/videos, and their timeline
    all                 Both of the above (default)

OPTIONS:
    --config, -c PATH   Path to config file
    --db PATH           Path to Photos.sqlite (overrides config)
    --output, -o DIR    Directory for CSV and PNG files (overrides config)
    --no-anonymize      Keep real people names in all outputs
    --no-charts         Skip PNG chart rendering
    --no-display        Do not open charts in an image viewer
    --version, -V       Show version
    --help, -h          Show this help message

ENVIRONMENT:
    PHOTOLENS_CONFIG    Path to config file (overrides default location)
    PHOTOLENS_LOG       Log level (trace, debug, info, warn, error)

Config file location: $XDG_CONFIG_HOME/photolens/config.toml"#
    );
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load().context("Failed to load configuration")?,
    };

    if let Some(db_path) = &args.db_path {
        config.library.db_path = db_path.clone();
    }
    if let Some(output_dir) = &args.output_dir {
        config.output.dir = output_dir.clone();
    }
    if args.no_anonymize {
        config.people.anonymize = false;
    }
    if args.no_charts {
        config.output.charts = false;
    }
    if args.no_display {
        config.output.display = false;
    }

    Ok(config)
}

fn run(kind: Pipeline, config: &Config, out: &mut dyn Write) -> Result<()> {
    let outcome = match kind {
        Pipeline::Growth => {
            pipeline::run_growth(config, out).context("Library growth analysis failed")?
        }
        Pipeline::People => pipeline::run_people(config, out).context("People analysis failed")?,
    };

    match outcome {
        RunOutcome::Completed(summary) => {
            tracing::info!(
                "{:?} run finished: {} rows, {} dropped, {} files written",
                kind,
                summary.rows,
                summary.dropped,
                summary.artifacts.len()
            );
        }
        RunOutcome::NoData => tracing::info!("{:?} run found no data", kind),
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = parse_args();

    let _ = logging::init(None);

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:?}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!("Using library database {:?}", config.library.db_path);

    let pipelines: &[Pipeline] = match args.command.unwrap_or(Command::All) {
        Command::All => &[Pipeline::Growth, Pipeline::People],
        Command::Growth => &[Pipeline::Growth],
        Command::People => &[Pipeline::People],
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut failed = false;

    for (n, &kind) in pipelines.iter().enumerate() {
        if n > 0 {
            let _ = writeln!(out);
        }
        if let Err(e) = run(kind, &config, &mut out) {
            tracing::error!("{:#}", e);
            let _ = out.flush();
            eprintln!("Error: {:?}", e);
            failed = true;
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
