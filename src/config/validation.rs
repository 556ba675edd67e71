use crate::config::types::ConfigLayer;
use crate::ConfigError;

/// Upper bound on the worker pool size
pub const MAX_THREADS_LIMIT: usize = 1024;

/// Validates a merged configuration layer before it is turned into a `Config`
///
/// Durations are built from the raw seconds afterwards, so anything that would
/// make `Duration::from_secs_f64` panic has to be rejected here.
pub fn validate(layer: &ConfigLayer) -> Result<(), ConfigError> {
    if let Some(timeout) = layer.connect_timeout {
        validate_timeout("connect_timeout", timeout)?;
    }

    if let Some(timeout) = layer.read_timeout {
        validate_timeout("read_timeout", timeout)?;
    }

    if let Some(retries) = layer.max_retries {
        if retries < 1 {
            return Err(ConfigError::Validation(format!(
                "max_retries must be >= 1, got {}",
                retries
            )));
        }
    }

    if let Some(threads) = layer.max_threads {
        if threads < 1 || threads > MAX_THREADS_LIMIT {
            return Err(ConfigError::Validation(format!(
                "max_threads must be between 1 and {}, got {}",
                MAX_THREADS_LIMIT, threads
            )));
        }
    }

    if let Some(output) = &layer.output {
        if output.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "output path cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

/// Timeouts are given in (possibly fractional) seconds
fn validate_timeout(name: &str, seconds: f64) -> Result<(), ConfigError> {
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "{} must be a positive number of seconds, got {}",
            name, seconds
        )));
    }

    // Duration::from_secs_f64 panics past u64::MAX seconds
    if seconds > u32::MAX as f64 {
        return Err(ConfigError::Validation(format!(
            "{} is too large: {}",
            name, seconds
        )));
    }

    Ok(())
}
