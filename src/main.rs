use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use confdiff::Config;
use error_set::error_set;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::{fs, process};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, fmt};

error_set! {
    /// Errors surfaced by the command line
    CliError := {
        #[display("Failed to read {path}: {message}")]
        ReadFailed { path: String, message: String },
        #[display("{path}: {message}")]
        InvalidConfig { path: String, message: String },
        #[display("Failed to write output: {message}")]
        WriteFailed { message: String },
    }
}

#[derive(Parser)]
#[command(name = "confdiff", version)]
#[command(about = "Order-insensitive structural diff for indented configuration files")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the differences between two configuration files
    Diff {
        /// Original configuration
        old: PathBuf,
        /// Updated configuration
        new: PathBuf,
        /// Only show changed lines and the blocks that contain them
        #[arg(short, long)]
        concise: bool,
    },
    /// Count added, removed and unchanged lines
    Stat {
        /// Original configuration
        old: PathBuf,
        /// Updated configuration
        new: PathBuf,
    },
    /// Print shell completions
    Completions {
        shell: Shell,
    },
    /// Print a roff man page
    Man,
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    if let Err(e) = run(cli.command, &mut io::stdout().lock()) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(command: Commands, out: &mut impl Write) -> Result<(), CliError> {
    match command {
        Commands::Diff { old, new, concise } => {
            let (old, new) = (read_config(&old)?, read_config(&new)?);
            if concise {
                let output = old.concise_diff(&new);
                if !output.is_empty() {
                    writeln!(out, "{output}").map_err(write_failed)?;
                }
            } else {
                write!(out, "{}", old.diff(&new)).map_err(write_failed)?;
            }
        }
        Commands::Stat { old, new } => {
            let (old, new) = (read_config(&old)?, read_config(&new)?);
            writeln!(out, "{}", old.stats(&new)).map_err(write_failed)?;
        }
        Commands::Completions { shell } => {
            // Generated into memory first, clap_complete panics on write errors
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            let mut script = Vec::new();
            clap_complete::generate(shell, &mut cmd, name, &mut script);
            out.write_all(&script).map_err(write_failed)?;
        }
        Commands::Man => {
            clap_mangen::Man::new(Cli::command())
                .render(out)
                .map_err(write_failed)?;
        }
    }
    out.flush().map_err(write_failed)
}

fn write_failed(e: io::Error) -> CliError {
    CliError::WriteFailed {
        message: e.to_string(),
    }
}

/// Read and parse one configuration file
fn read_config(path: &Path) -> Result<Config, CliError> {
    let text = fs::read_to_string(path).map_err(|e| CliError::ReadFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    tracing::info!(path = %path.display(), bytes = text.len(), "read configuration");

    Config::parse(&text).map_err(|e| CliError::InvalidConfig {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();
}
