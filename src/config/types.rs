use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default output file, relative to the current directory
pub const DEFAULT_OUTPUT_PATH: &str = "out.csv";

/// Default connect timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT: f64 = 10.0;

/// Default read timeout in seconds
pub const DEFAULT_READ_TIMEOUT: f64 = 15.0;

/// Default number of redirects followed per request
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Default number of attempts made against a URL that keeps timing out
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Fully resolved configuration for one run
///
/// Built once at startup and passed by reference into every component. There
/// is no lazily initialized state hiding behind it.
#[derive(Debug, Clone)]
pub struct Config {
    /// Final CSV output path. Also the source of the resume cache.
    pub output_path: PathBuf,

    /// HTTP behavior shared by every fetch in the run
    pub fetch: FetchPolicy,

    /// Upper bound on concurrently running row resolutions
    pub max_threads: usize,

    /// Verbose logging to the console instead of the log file
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            fetch: FetchPolicy::default(),
            max_threads: default_max_threads(),
            debug: false,
        }
    }
}

/// Timeout, redirect and retry policy applied to every GET
#[derive(Debug, Clone, PartialEq)]
pub struct FetchPolicy {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub max_redirects: usize,

    /// Total attempts made when a request times out
    pub max_retries: u32,

    /// Linear backoff unit: the n-th timeout sleeps `n * retry_backoff`
    pub retry_backoff: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs_f64(DEFAULT_CONNECT_TIMEOUT),
            read_timeout: Duration::from_secs_f64(DEFAULT_READ_TIMEOUT),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff: Duration::from_secs(1),
        }
    }
}

/// One layer of partially specified options
///
/// The command line, the environment and the optional TOML file each produce
/// a layer. Layers are merged field by field, highest precedence first, and
/// whatever is still missing falls back to the defaults above.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigLayer {
    pub output: Option<PathBuf>,
    pub connect_timeout: Option<f64>,
    pub read_timeout: Option<f64>,
    pub max_redirects: Option<usize>,
    pub max_retries: Option<u32>,
    pub max_threads: Option<usize>,
    pub debug: Option<bool>,
}

impl ConfigLayer {
    /// Fills every unset field of `self` from `lower`
    pub fn or(self, lower: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            output: self.output.or(lower.output),
            connect_timeout: self.connect_timeout.or(lower.connect_timeout),
            read_timeout: self.read_timeout.or(lower.read_timeout),
            max_redirects: self.max_redirects.or(lower.max_redirects),
            max_retries: self.max_retries.or(lower.max_retries),
            max_threads: self.max_threads.or(lower.max_threads),
            debug: self.debug.or(lower.debug),
        }
    }
}

/// Number of logical CPUs, the default worker count
pub fn default_max_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
