//! API Listing Sync CLI
//!
//! Command-line interface for publishing an OpenAPI document to an API hub
//! listing, meant to run as a CI step.

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use listing_sync::{
    append_output_file, env, read_spec, write_result, Config, HubGateway, OutputFormat,
    Reconciler, Settings, SyncError,
};

/// Exit code when result outputs cannot be written.
const OUTPUT_ERROR: u8 = 8;

#[derive(Parser)]
#[command(name = "listing-sync")]
#[command(about = "Create or version an API hub listing from an OpenAPI document")]
#[command(version)]
struct Cli {
    /// Log verbosity (RUST_LOG takes precedence when set)
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the listing, or publish the spec as a new current version
    Publish(PublishArgs),

    /// Print the name, version and description read from a spec
    Inspect {
        /// Spec file to read
        spec: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct PublishArgs {
    /// API key sent with every request
    #[arg(long, env = env::API_KEY, hide_env_values = true)]
    api_key: Option<String>,

    /// Identity key header for the metadata endpoint
    #[arg(long, env = env::IDENTITY_KEY, hide_env_values = true)]
    identity_key: Option<String>,

    /// Host header for the metadata endpoint
    #[arg(long, env = env::GRAPHQL_HOST)]
    graphql_host: Option<String>,

    /// Host header for the upload endpoint
    #[arg(long, env = env::REST_HOST)]
    rest_host: Option<String>,

    /// Metadata endpoint URL
    #[arg(long, env = env::GRAPHQL_URL)]
    graphql_url: Option<String>,

    /// Upload endpoint base URL
    #[arg(long, env = env::REST_URL)]
    rest_url: Option<String>,

    /// Only consider listings owned by this owner id
    #[arg(long, env = env::OWNER_ID)]
    owner_id: Option<String>,

    /// OpenAPI document to publish
    #[arg(long, env = env::SPEC_PATH)]
    spec_path: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, env = env::TIMEOUT_SECS)]
    timeout_secs: Option<String>,

    /// Format of the result lines on stdout
    #[arg(long, value_enum, default_value_t = Format::KeyValue)]
    format: Format,

    /// File that result lines are appended to
    #[arg(long, env = "GITHUB_OUTPUT")]
    github_output: Option<String>,
}

impl PublishArgs {
    fn settings(&self) -> Settings {
        Settings {
            api_key: self.api_key.clone(),
            identity_key: self.identity_key.clone(),
            graphql_host: self.graphql_host.clone(),
            rest_host: self.rest_host.clone(),
            graphql_url: self.graphql_url.clone(),
            rest_url: self.rest_url.clone(),
            owner_id: self.owner_id.clone(),
            spec_path: self.spec_path.clone(),
            timeout_secs: self.timeout_secs.clone(),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    KeyValue,
    SetOutput,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::KeyValue => OutputFormat::KeyValue,
            Format::SetOutput => OutputFormat::SetOutput,
            Format::Json => OutputFormat::Json,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Logs go to stderr; stdout carries only result lines.
fn initialize_tracing(log_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_filter_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    initialize_tracing(cli.log_level);

    let result = match cli.command {
        Commands::Publish(args) => run_publish(&args),
        Commands::Inspect { spec, json } => run_inspect(&spec, json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn run_publish(args: &PublishArgs) -> Result<(), u8> {
    // Everything the run needs from the environment is read here, up front.
    let config = Config::from_settings(args.settings()).map_err(report_error)?;
    let output_file = args
        .github_output
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from);

    let spec = read_spec(&config.spec_path).map_err(report_error)?;
    info!(name = %spec.name, version = %spec.version, "read spec");

    let gateway = HubGateway::new(&config).map_err(report_error)?;
    let result = Reconciler::new(gateway)
        .owner_scope(config.owner)
        .publish(&spec)
        .map_err(report_error)?;
    info!(
        outcome = ?result.outcome,
        api_id = %result.api_id,
        version_id = %result.version_id,
        "reconciliation finished"
    );

    let stdout = io::stdout();
    write_result(&mut stdout.lock(), &result, args.format.into()).map_err(|e| {
        eprintln!("Error writing results: {}", e);
        OUTPUT_ERROR
    })?;

    if let Some(path) = output_file {
        debug!(path = %path.display(), "appending step outputs");
        append_output_file(&path, &result).map_err(|e| {
            eprintln!("Error writing to {}: {}", path.display(), e);
            OUTPUT_ERROR
        })?;
    }

    Ok(())
}

fn run_inspect(path: &Path, json: bool) -> Result<(), u8> {
    let spec = read_spec(path).map_err(report_error)?;

    if json {
        let output = serde_json::json!({
            "name": spec.name,
            "version": spec.version,
            "description": spec.description,
        });
        println!("{}", output);
    } else {
        println!("name: {}", spec.name);
        println!("version: {}", spec.version);
        if let Some(description) = &spec.description {
            println!("description: {}", description);
        }
    }
    Ok(())
}

/// Print a diagnostic and return the exit code for its category.
fn report_error(err: SyncError) -> u8 {
    eprintln!("Error: {}", err);
    err.exit_code() as u8
}
