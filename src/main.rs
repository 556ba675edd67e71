//! Title Grabber main entry point
//!
//! This is the command-line interface for the title grabber.

use anyhow::Context;
use clap::builder::FalseyValueParser;
use clap::Parser;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use title_grabber::config::{
    default_max_threads, resolve_config, ConfigLayer, DEFAULT_CONNECT_TIMEOUT,
    DEFAULT_MAX_REDIRECTS, DEFAULT_MAX_RETRIES, DEFAULT_OUTPUT_PATH, DEFAULT_READ_TIMEOUT,
};
use title_grabber::crawler::{run_batch, InputSource};
use tracing_subscriber::EnvFilter;

/// Log file written in the current directory unless --debug is given
const LOG_FILE: &str = "title_grabber.log";

/// Grabs page & article titles from lists of URLs contained in files passed in
/// as arguments
///
/// Every line of every input is scanned for its first http(s) URL. Rows already
/// present in the output file with both titles are reused instead of being
/// fetched again.
#[derive(Parser, Debug)]
#[command(name = "title-grabber")]
#[command(version)]
#[command(about = "Grabs page & article titles from lists of URLs", long_about = None)]
struct Cli {
    /// 1 or more files containing URLs (1 per line); `-` reads standard input
    #[arg(value_name = "FILES")]
    files: Vec<String>,

    #[arg(
        short,
        long,
        value_name = "OUT_FILE",
        env = "OUTPUT",
        help = format!("Output file [default: {}]", DEFAULT_OUTPUT_PATH)
    )]
    output: Option<PathBuf>,

    #[arg(
        long,
        value_name = "TIMEOUT",
        env = "CONNECT_TIMEOUT",
        help = format!("HTTP connect timeout in seconds [default: {}]", DEFAULT_CONNECT_TIMEOUT)
    )]
    connect_timeout: Option<f64>,

    #[arg(
        long,
        value_name = "TIMEOUT",
        env = "READ_TIMEOUT",
        help = format!("HTTP read timeout in seconds [default: {}]", DEFAULT_READ_TIMEOUT)
    )]
    read_timeout: Option<f64>,

    #[arg(
        long,
        value_name = "REDIRECTS",
        env = "MAX_REDIRECTS",
        help = format!("Max. # of HTTP redirects to follow [default: {}]", DEFAULT_MAX_REDIRECTS)
    )]
    max_redirects: Option<usize>,

    #[arg(
        short = 'r',
        long,
        value_name = "RETRIES",
        env = "MAX_RETRIES",
        help = format!("Max. # of attempts for requests that time out [default: {}]", DEFAULT_MAX_RETRIES)
    )]
    max_retries: Option<u32>,

    #[arg(
        short = 't',
        long,
        value_name = "THREADS",
        env = "MAX_THREADS",
        help = format!("Max. # of concurrent fetches [default: # of logical CPUs ({})]", default_max_threads())
    )]
    max_threads: Option<usize>,

    /// Log to stderr at debug level instead of to a file in the current directory
    #[arg(short, long, env = "DEBUG", value_parser = FalseyValueParser::new())]
    debug: bool,

    /// Optional TOML file with defaults for any of the options above
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,
}

impl Cli {
    /// Values given on the command line or through the environment
    fn overrides(&self) -> ConfigLayer {
        ConfigLayer {
            output: self.output.clone(),
            connect_timeout: self.connect_timeout,
            read_timeout: self.read_timeout,
            max_redirects: self.max_redirects,
            max_retries: self.max_retries,
            max_threads: self.max_threads,
            debug: self.debug.then_some(true),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.files.is_empty() {
        eprintln!("At least 1 input file is required!");
        std::process::exit(1);
    }

    let config = resolve_config(cli.overrides(), cli.config.as_deref())
        .context("Invalid configuration")?;

    setup_logging(config.debug)?;

    tracing::debug!("Resolved configuration: {:?}", config);

    let inputs: Vec<InputSource> = cli.files.iter().map(|f| InputSource::from_arg(f)).collect();

    match run_batch(config, &inputs).await {
        Ok(summary) => {
            tracing::info!("Finished: {}", summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber
///
/// Debug mode logs to stderr; otherwise the log goes to `title_grabber.log`,
/// truncated on every run. `RUST_LOG` overrides the level in both cases.
fn setup_logging(debug: bool) -> anyhow::Result<()> {
    let default_filter = if debug {
        "title_grabber=debug,warn"
    } else {
        "title_grabber=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(true)
            .init();
    } else {
        let file = File::create(LOG_FILE)
            .with_context(|| format!("Failed to create log file {}", LOG_FILE))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(false)
            .with_thread_ids(true)
            .init();
    }

    Ok(())
}
