//! CLI utilities for binaries
//!
//! Resolves the configuration file location from the command line or
//! environment.

use std::path::PathBuf;

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "sjtop.json";

/// Environment variable overriding the configuration path
pub const CONFIG_PATH_ENV: &str = "SJTOP_CONFIG_PATH";

/// Resolve the configuration path.
///
/// An explicit argument wins, then `SJTOP_CONFIG_PATH`, then `sjtop.json`.
///
/// # Examples
/// ```
/// use sjtop::bin_common::resolve_config_path;
///
/// let path = resolve_config_path(Some("custom.json".to_string()));
/// assert_eq!(path.to_str(), Some("custom.json"));
/// ```
pub fn resolve_config_path(arg: Option<String>) -> PathBuf {
    resolve_with(arg, |key| std::env::var(key).ok())
}

fn resolve_with<F>(arg: Option<String>, lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    arg.or_else(|| lookup(CONFIG_PATH_ENV).filter(|v| !v.is_empty()))
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
        .into()
}

/// Parse command line arguments for a binary
///
/// Returns a vector of arguments (excluding the program name)
pub fn parse_args() -> Vec<String> {
    std::env::args().skip(1).collect()
}
