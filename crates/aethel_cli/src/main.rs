//! Aethel CLI
//!
//! Headless tooling for the site motion layer:
//! - `aethel run` replays a recorded scenario and writes a JSON report
//! - `aethel sample` sweeps the scroll position and prints one output
//! - `aethel config` prints the resolved site configuration

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

/// Headless tooling for the Aethel motion layer
#[derive(Parser, Debug)]
#[command(name = "aethel")]
#[command(about = "Replay scenarios and inspect scroll mappings without a browser")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory containing aethel.toml, or the file itself
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a scenario against the headless site
    Run {
        /// Scenario file (JSON)
        scenario: PathBuf,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Sweep the scroll position and print one output per step
    Sample {
        /// Output name, e.g. `hero.line_1.y`
        output: String,

        /// First scroll position in pixels
        #[arg(long, default_value = "0")]
        from: f32,

        /// Last scroll position; defaults to the bottom of the page
        #[arg(long)]
        to: Option<f32>,

        /// Number of intervals between `from` and `to`
        #[arg(long, default_value = "10")]
        steps: usize,

        /// Frames to run after each scroll, for smoothed outputs
        #[arg(long, default_value = "0")]
        frames: u32,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the resolved configuration as TOML
    Config,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_deref())?;
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Command::Run { scenario, report } => {
            info!("Replaying {}", scenario.display());
            let passed = commands::run(config, &scenario, report.as_deref(), &mut stdout)?;
            if !passed {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Sample {
            output,
            from,
            to,
            steps,
            frames,
            json,
        } => {
            let sweep = commands::Sweep {
                output,
                from,
                to,
                steps,
                frames,
            };
            let samples = commands::sample(config, &sweep)?;
            if json {
                commands::write_json(&samples, &mut stdout)?;
            } else {
                commands::write_table(&sweep.output, &samples, &mut stdout)?;
            }
        }
        Command::Config => commands::print_config(&config, &mut stdout)?,
    }

    Ok(ExitCode::SUCCESS)
}
