//! Configuration module for Title Grabber
//!
//! Options come from command-line flags, environment variables, an optional
//! TOML file and built-in defaults, in that order of precedence. The result is
//! one immutable `Config` built at startup.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use title_grabber::config::{resolve_config, ConfigLayer};
//!
//! let config = resolve_config(ConfigLayer::default(), Some(Path::new("title-grabber.toml"))).unwrap();
//! println!("Writing to {}", config.output_path.display());
//! ```

mod parser;
mod types;
mod validation;

pub use parser::{build_config, load_config_file, resolve_config};
pub use types::{
    default_max_threads, Config, ConfigLayer, FetchPolicy, DEFAULT_CONNECT_TIMEOUT,
    DEFAULT_MAX_REDIRECTS, DEFAULT_MAX_RETRIES, DEFAULT_OUTPUT_PATH, DEFAULT_READ_TIMEOUT,
};
pub use validation::MAX_THREADS_LIMIT;
