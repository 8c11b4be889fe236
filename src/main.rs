use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use tsr::Format;

/// Environment variable holding the log filter (e.g. `TSR_LOG=debug`).
const LOG_ENV: &str = "TSR_LOG";

#[derive(Parser)]
#[command(name = "tsr")]
#[command(version, about = "Typing Session Replay - replay recorded text-editing sessions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show session metadata and event statistics
    Info {
        /// Session document (.json, or .jsonl/.ndjson for streaming)
        file: PathBuf,
    },

    /// Print the reconstructed editor state as JSON
    #[command(long_about = "Print the reconstructed editor state as JSON.

Without --at the whole session is applied. With --at MS every event at or
before MS milliseconds is applied, exactly as a seek would.

EXAMPLES:
    tsr state session.json
    tsr state session.jsonl --at 1500")]
    State {
        file: PathBuf,
        /// Position on the timeline in milliseconds
        #[arg(long, value_name = "MS")]
        at: Option<u64>,
        /// Print the annotated text instead of JSON
        #[arg(long)]
        annotate: bool,
    },

    /// Replay a session in the terminal
    #[command(long_about = "Replay a session in the terminal.

Controls:
    space      Play / pause
    ← / →      Seek backward / forward
    + / -      Speed up / slow down
    l          Toggle looping
    r          Restart from the beginning
    q, Esc     Quit")]
    Play {
        file: PathBuf,
        /// Playback speed multiplier (overrides config)
        #[arg(long)]
        speed: Option<f64>,
        /// Restart after the last event (overrides config)
        #[arg(long = "loop")]
        looping: bool,
    },

    /// Convert between JSON and NDJSON encodings
    Convert {
        file: PathBuf,
        /// Target encoding
        #[arg(long, value_enum)]
        to: OutputFormat,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the current configuration as TOML
    Config,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Ndjson,
}

impl From<OutputFormat> for Format {
    fn from(value: OutputFormat) -> Self {
        match value {
            OutputFormat::Json => Format::Json,
            OutputFormat::Ndjson => Format::Ndjson,
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(not(tarpaulin_include))]
fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Info { file } => commands::info::handle(&file),
        Commands::State {
            file,
            at,
            annotate,
        } => commands::state::handle(&file, at, annotate),
        Commands::Play {
            file,
            speed,
            looping,
        } => commands::play::handle(&file, speed, looping),
        Commands::Convert { file, to, output } => {
            commands::convert::handle(&file, to.into(), output.as_deref())
        }
        Commands::Config => commands::config::handle_show(),
    }
}
