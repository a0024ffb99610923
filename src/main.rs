use clap::{Args, Parser, Subcommand};
use dialoguer::Input;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use tvhelper::{Config, ProgressEvent, add_series, confirm_line, is_yes};

/// TV Helper CLI Tool
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Add a TV series by TVDB ID
    AddSeries(AddSeriesArgs),
}

#[derive(Args)]
struct AddSeriesArgs {
    /// The TVDB ID of the series
    ///
    /// Parsed as a number, so leading zeros are dropped from the folder name
    #[arg(long)]
    tvdb_id: u64,

    /// The base path where the folder should be located
    #[arg(long)]
    base_path: PathBuf,

    /// Also create season folders and list episodes in show_details.json
    #[arg(long)]
    with_seasons: bool,

    /// Read the API settings from this JSON file instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

/// Handles progress events and prints formatted output to stdout
fn handle_progress_event(event: ProgressEvent) {
    match event {
        ProgressEvent::Started { tvdb_id, base_path } => {
            println!(
                "Adding series {} to {}...",
                tvdb_id,
                base_path.display()
            );
        }
        ProgressEvent::FetchingSeries { tvdb_id } => {
            println!("Fetching series {} from TheTVDB...", tvdb_id);
        }
        ProgressEvent::SeriesFetched {
            series_name,
            season_count,
        } => {
            println!("Found '{}' with {} season(s)", series_name, season_count);
        }
        ProgressEvent::NoFolderChanges => {
            println!("No folder changes made.");
        }
        ProgressEvent::RenamingFolder { from, to } => {
            println!(
                "Renaming folder from {} to {}",
                from.display(),
                to.display()
            );
        }
        ProgressEvent::FolderNotUpdated { .. } => {
            println!("Folder not updated.");
        }
        ProgressEvent::CreatingFolder { .. } => {
            println!("Didn't find a matching directory, creating a new one");
        }
        ProgressEvent::SeasonFolderCreated { path } => {
            println!("  {}", path.display());
        }
        ProgressEvent::MetadataWritten { path } => {
            println!("Saved show details to {}", path.display());
        }
        ProgressEvent::Complete { show_path } => {
            println!("\nDone! Show folder: {}", show_path.display());
        }
    }
}

/// Asks a yes/no question, answered by typing `yes`
///
/// Falls back to reading plain lines when stdin is not a terminal.
fn confirm_on_terminal(prompt: &str) -> io::Result<bool> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return confirm_line(&mut stdin.lock(), &mut io::stdout(), prompt);
    }

    let answer: String = Input::new()
        .with_prompt(format!("{} (yes/no)", prompt))
        .allow_empty(true)
        .interact_text()
        .map_err(io::Error::other)?;

    Ok(is_yes(&answer))
}

fn run_add_series(args: AddSeriesArgs) {
    if !args.base_path.exists() {
        eprintln!(
            "Error: Directory does not exist: {}",
            args.base_path.display()
        );
        process::exit(1);
    }

    if !args.base_path.is_dir() {
        eprintln!(
            "Error: Path is not a directory: {}",
            args.base_path.display()
        );
        process::exit(1);
    }

    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    debug!(api_url = %config.api_url, "Configuration loaded");

    if let Err(e) = add_series(
        &config,
        args.tvdb_id,
        &args.base_path,
        args.with_seasons,
        confirm_on_terminal,
        handle_progress_event,
    ) {
        eprintln!("\nError: {}", e);
        process::exit(1);
    }
}

fn main() {
    let dotenv = dotenvy::dotenv();
    init_tracing();
    match dotenv {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Failed to load .env file: {}", e),
    }

    let cli = Cli::parse();

    // Without a subcommand there is nothing to do
    let Some(command) = cli.command else {
        return;
    };

    match command {
        Command::AddSeries(args) => run_add_series(args),
    }
}
