//! illdb CLI - read and write illdb documents through the browser tool

mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use illdb_core::domain::{BrowserCommand, ProfileRegistry};
use illdb_core::port::time_provider::SystemTimeProvider;
use illdb_core::{StoreAdapter, StoreResponse};
use illdb_infra_system::{ProfileLoader, SubprocessRunner};

const DEFAULT_PROFILES_PATH: &str = "~/.illdb/profiles.toml";
const DEFAULT_BROWSER: &str = "python illdb_browser.py";

#[derive(Parser)]
#[command(name = "illdb")]
#[command(about = "illdb key-value CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Profile name (resolves ILLDB_<PROFILE>_{HOST,PORT,USER,PWD})
    #[arg(short = 'P', long, env = "ILLDB_PROFILE", default_value = "dev")]
    profile: String,

    /// Profiles file (TOML, YAML or JSON)
    #[arg(short, long, env = "ILLDB_CONFIG")]
    config: Option<PathBuf>,

    /// Browser tool command line, split on whitespace. With --program-arg the
    /// value is used verbatim as the executable path (may contain spaces)
    #[arg(long, env = "ILLDB_BROWSER", default_value = DEFAULT_BROWSER)]
    program: String,

    /// Argument passed to the browser program before the bucket (repeatable)
    #[arg(long = "program-arg", value_name = "ARG", allow_hyphen_values = true)]
    program_arg: Vec<String>,

    /// Print the full response as JSON
    #[arg(long)]
    json: bool,

    /// Debug logging (shows the browser command, password masked)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a document by key
    Get {
        /// Bucket name
        bucket: String,

        /// Document key (e.g. 148:account:<uid>)
        key: String,
    },

    /// Write a document under a key
    Set {
        /// Bucket name
        bucket: String,

        /// Document key
        key: String,

        /// Document value
        value: String,
    },

    /// List profiles with all four fields defined
    Profiles,
}

/// Explicit --config must exist; the default path is optional
fn profiles_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path),
        None => {
            let path = PathBuf::from(shellexpand::tilde(DEFAULT_PROFILES_PATH).into_owned());
            path.exists().then_some(path)
        }
    }
}

fn print_response(response: &StoreResponse, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(response)?);
        return Ok(());
    }

    if !response.response.is_empty() {
        println!("{}", response.response.text);
    }
    if !response.error.is_empty() {
        eprintln!("{} {}", "✗".red(), response.error.text.red());
    }
    if response.response.truncated || response.error.truncated {
        eprintln!("{}", "(output truncated)".yellow());
    }
    Ok(())
}

fn list_profiles(registry: &ProfileRegistry) {
    let names = registry.profile_names();
    if names.is_empty() {
        println!("{}", "No complete profiles defined".yellow());
    }
    for name in names {
        println!("{}", name.to_lowercase());
    }
}

fn browser_command(program: &str, program_args: &[String]) -> Result<BrowserCommand> {
    BrowserCommand::from_parts(program, program_args.to_vec())
        .with_context(|| format!("Invalid browser command: {:?}", program))
}

fn connect_adapter(
    registry: ProfileRegistry,
    command: BrowserCommand,
    profile: &str,
) -> Result<StoreAdapter> {
    let runner = Arc::new(SubprocessRunner::new(Arc::new(SystemTimeProvider)));
    let mut adapter = StoreAdapter::new(Arc::new(registry), runner).with_command(command);
    adapter.connect(profile)?;
    Ok(adapter)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    info!("illdb v{} starting...", illdb_core::VERSION);

    let registry = ProfileLoader::load(profiles_path(cli.config).as_deref())
        .context("Failed to load illdb profiles")?;

    let response = match cli.command {
        Commands::Profiles => {
            list_profiles(&registry);
            return Ok(());
        }
        Commands::Get { bucket, key } => {
            let command = browser_command(&cli.program, &cli.program_arg)?;
            let adapter = connect_adapter(registry, command, &cli.profile)?;
            adapter.get_by_key(&bucket, &key).await?
        }
        Commands::Set { bucket, key, value } => {
            let command = browser_command(&cli.program, &cli.program_arg)?;
            let adapter = connect_adapter(registry, command, &cli.profile)?;
            adapter.set_key_value(&bucket, &key, &value).await?
        }
    };

    debug!(exit_code = ?response.exit_code, duration_ms = response.duration_ms, "Done");
    print_response(&response, cli.json)?;

    // Mirror the browser tool's exit status
    match response.exit_code {
        Some(0) | None => Ok(()),
        Some(code) => std::process::exit(code),
    }
}
