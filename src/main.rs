//! Roomstat - chatroom activity reports
//!
//! A CLI tool that reads a JSON chatroom export from standard input and
//! produces an activity heatmap, an engagement trend, a per-speaker
//! contribution chart or a word-frequency table.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Invalid arguments, malformed input or unknown report

mod analysis;
mod cli;
mod config;
mod corpus;
mod error;
mod models;
mod report;
mod time;

use anyhow::{Context, Result};
use cli::Args;
use config::{Config, DEFAULT_CONFIG_FILE};
use report::{Dispatched, Dispatcher, RenderTarget, ReportRegistry, ReportRenderer};
use time::{Normalizer, TimestampPolicy, ViewerZone};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    debug!("Roomstat v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args) {
        error!("Run failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .roomstat.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("Created {} with default settings.", DEFAULT_CONFIG_FILE);
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so report text on stdout stays clean.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load, normalize, aggregate and deliver one report.
fn run(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate()?;

    // Resolve everything that can fail before touching stdin
    let registry = ReportRegistry::from_config(&config);
    let report = registry.resolve(&config.general.report)?;
    let zone = ViewerZone::from_name(&config.general.timezone)?;
    let policy = if config.general.strict_timestamps {
        TimestampPolicy::Abort
    } else {
        TimestampPolicy::Skip
    };
    info!("Report: {}", report.name());

    // Step 1: Load the corpus
    let messages = corpus::load_corpus(std::io::stdin().lock())?;
    info!("Loaded {} messages", messages.len());

    let messages = corpus::filter_by_user(messages, &args.user);
    if !args.user.is_empty() {
        info!("{} messages from {}", messages.len(), args.user);
        if messages.is_empty() {
            warn!("No messages from user '{}'", args.user);
        }
    }

    // Step 2: Normalize timestamps and apply the date window
    let localized = Normalizer::new(zone, policy).normalize(messages)?;
    let localized = args.date_window().apply(localized);
    debug!("{} messages after normalization", localized.len());

    // Step 3: Aggregate and hand off
    let renderer = ReportRenderer::new(config.general.format);
    let dispatcher = Dispatcher::new(&renderer, RenderTarget::from_output(&config.general.output));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match dispatcher.dispatch(report, &localized, &mut out)? {
        Dispatched::Rendered(RenderTarget::File(path)) => {
            info!("Chart saved to {}", path.display());
        }
        Dispatched::Rendered(RenderTarget::Display) => {}
        Dispatched::Printed(lines) => debug!("Printed {} lines", lines),
    }

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}
