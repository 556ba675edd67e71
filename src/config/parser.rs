use crate::config::types::{
    default_max_threads, Config, ConfigLayer, FetchPolicy, DEFAULT_CONNECT_TIMEOUT,
    DEFAULT_MAX_REDIRECTS, DEFAULT_MAX_RETRIES, DEFAULT_OUTPUT_PATH, DEFAULT_READ_TIMEOUT,
};
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Loads an optional TOML configuration file
///
/// Every key is optional; the file only supplies values that neither the
/// command line nor the environment set.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use title_grabber::config::load_config_file;
///
/// let layer = load_config_file(Path::new("title-grabber.toml")).unwrap();
/// println!("Retries: {:?}", layer.max_retries);
/// ```
pub fn load_config_file(path: &Path) -> Result<ConfigLayer, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let layer: ConfigLayer = toml::from_str(&content)?;
    validate(&layer)?;
    Ok(layer)
}

/// Merges the command-line/environment layer over the optional file layer and
/// fills the rest from defaults
///
/// # Arguments
///
/// * `overrides` - Values from flags and environment variables
/// * `file` - Optional TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Validated configuration
/// * `Err(ConfigError)` - The file could not be loaded or a value is invalid
pub fn resolve_config(overrides: ConfigLayer, file: Option<&Path>) -> Result<Config, ConfigError> {
    let file_layer = match file {
        Some(path) => load_config_file(path)?,
        None => ConfigLayer::default(),
    };

    build_config(overrides.or(file_layer))
}

/// Turns a merged layer into a `Config`, applying defaults
pub fn build_config(layer: ConfigLayer) -> Result<Config, ConfigError> {
    validate(&layer)?;

    let connect_timeout = layer.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT);
    let read_timeout = layer.read_timeout.unwrap_or(DEFAULT_READ_TIMEOUT);

    Ok(Config {
        output_path: layer
            .output
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH)),
        fetch: FetchPolicy {
            connect_timeout: Duration::from_secs_f64(connect_timeout),
            read_timeout: Duration::from_secs_f64(read_timeout),
            max_redirects: layer.max_redirects.unwrap_or(DEFAULT_MAX_REDIRECTS),
            max_retries: layer.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            ..FetchPolicy::default()
        },
        max_threads: layer.max_threads.unwrap_or_else(default_max_threads),
        debug: layer.debug.unwrap_or(false),
    })
}
