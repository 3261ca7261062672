//! CLI configuration.
//!
//! Logging settings come from three layers, later ones winning: built-in
//! defaults, an optional YAML file (`--config`), and environment variables.
//!
//! ```yaml
//! app:
//!   loglevel: debug
//!   logoutput: stderr
//!   logformat: text
//! ```
//!
//! Environment: `MITEM_LOG_LEVEL`, `MITEM_LOG_OUTPUT`, `MITEM_LOG_FORMAT`.
//! A `RUST_LOG` filter, when set, replaces the configured level; `-v`
//! flags replace both.
//!
//! Unusable values never fail the load: an unknown level becomes `debug`,
//! an unknown output `stdout` and an unknown format `text`. The fallbacks
//! are kept as warnings and logged once the subscriber is installed.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::Level;

pub const ENV_LOG_LEVEL: &str = "MITEM_LOG_LEVEL";
pub const ENV_LOG_OUTPUT: &str = "MITEM_LOG_OUTPUT";
pub const ENV_LOG_FORMAT: &str = "MITEM_LOG_FORMAT";

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_LOG_OUTPUT: &str = "stderr";
const DEFAULT_LOG_FORMAT: &str = "json";

/// Where log events are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    Stderr,
}

impl LogOutput {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

/// How log events are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Text,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
        }
    }
}

/// Effective logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: Level,
    pub output: LogOutput,
    pub format: LogFormat,
}

impl LogConfig {
    /// The filter directive to install. `-v` flags win, then a non-empty
    /// `RUST_LOG`, then the configured level.
    pub fn filter_directive(&self, verbose: u8, rust_log: Option<&str>) -> String {
        let level = match verbose {
            0 => match rust_log.map(str::trim).filter(|d| !d.is_empty()) {
                Some(directive) => return directive.to_string(),
                None => self.level,
            },
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        level.to_string().to_ascii_lowercase()
    }
}

/// Full CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub log: LogConfig,
    warnings: Vec<String>,
}

/// The `app:` section of a config file.
#[derive(Debug, Default, Deserialize)]
struct AppSection {
    loglevel: Option<String>,
    logoutput: Option<String>,
    logformat: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    app: Option<AppSection>,
}

impl CliConfig {
    /// Load from the optional file and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// Load from the optional file and an environment lookup.
    pub fn load_with_env(
        path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut level = DEFAULT_LOG_LEVEL.to_string();
        let mut output = DEFAULT_LOG_OUTPUT.to_string();
        let mut format = DEFAULT_LOG_FORMAT.to_string();

        if let Some(path) = path {
            let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            let file: ConfigFile = if content.trim().is_empty() {
                ConfigFile::default()
            } else {
                serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?
            };
            if let Some(app) = file.app {
                level = app.loglevel.unwrap_or(level);
                output = app.logoutput.unwrap_or(output);
                format = app.logformat.unwrap_or(format);
            }
        }

        level = env(ENV_LOG_LEVEL).unwrap_or(level);
        output = env(ENV_LOG_OUTPUT).unwrap_or(output);
        format = env(ENV_LOG_FORMAT).unwrap_or(format);

        let mut warnings = Vec::new();
        let log = LogConfig {
            level: translate_level(&level, &mut warnings),
            output: translate_output(&output, &mut warnings),
            format: translate_format(&format, &mut warnings),
        };
        Ok(Self { log, warnings })
    }

    /// Fallbacks applied while loading.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Log the effective settings and any load warnings.
    pub fn log_summary(&self) {
        for warning in &self.warnings {
            tracing::warn!("{warning}");
        }
        tracing::debug!(
            level = %self.log.level,
            output = self.log.output.as_str(),
            format = self.log.format.as_str(),
            "logging configured"
        );
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log: LogConfig {
                level: Level::INFO,
                output: LogOutput::Stderr,
                format: LogFormat::Json,
            },
            warnings: Vec::new(),
        }
    }
}

fn translate_level(raw: &str, warnings: &mut Vec<String>) -> Level {
    match raw.trim().to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        // fatal and panic have no tracing counterpart
        "error" | "fatal" | "panic" => Level::ERROR,
        _ => {
            warnings.push(format!(
                "unknown log level {raw:?} in config, setting log level to debug"
            ));
            Level::DEBUG
        }
    }
}

fn translate_output(raw: &str, warnings: &mut Vec<String>) -> LogOutput {
    match raw.trim() {
        "stderr" => LogOutput::Stderr,
        "stdout" => LogOutput::Stdout,
        _ => {
            warnings.push(format!("unknown log output {raw:?} in config, using stdout"));
            LogOutput::Stdout
        }
    }
}

fn translate_format(raw: &str, warnings: &mut Vec<String>) -> LogFormat {
    match raw.trim() {
        "json" => LogFormat::Json,
        "text" => LogFormat::Text,
        _ => {
            warnings.push(format!("unknown log format {raw:?} in config, using text"));
            LogFormat::Text
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}
