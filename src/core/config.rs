//! # Configuration
//!
//! Override hierarchy: defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.muse/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//!
//! Config is read before the logger exists (the log file is a config
//! value), so anything worth reporting is collected as a [`ConfigNotice`]
//! and replayed once logging is up.

use log::Level;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::feature::Feature;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MuseConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    /// Diagnostics from loading this file.
    #[serde(skip)]
    pub notices: Vec<ConfigNotice>,
}

/// A log record deferred until the logger is initialised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigNotice {
    pub level: Level,
    pub message: String,
}

impl ConfigNotice {
    fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub default_feature: Option<Feature>,
    pub log_file: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub usage_path: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_LOG_FILE: &str = "muse.log";
pub const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Debug;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub feature: Feature,
    pub base_url: String,
    /// `None` disables the request timeout.
    pub timeout: Option<Duration>,
    pub usage_path: Option<String>,
    pub log_file: PathBuf,
    pub log_level: log::LevelFilter,
    /// Load and resolve diagnostics, oldest first.
    pub notices: Vec<ConfigNotice>,
}

/// Values supplied on the command line. `None` = flag not given.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub feature: Option<Feature>,
    pub base_url: Option<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.muse/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".muse").join("config.toml"))
}

/// Load config from `path`, or from `~/.muse/config.toml` when `path` is `None`.
///
/// A missing default config file is generated (commented out) and treated as
/// empty. An explicitly given path must exist.
pub fn load_config(path: Option<&Path>) -> Result<MuseConfig, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match config_path() {
            Some(p) => {
                if !p.exists() {
                    let mut config = MuseConfig::default();
                    config.notices.push(ConfigNotice::new(
                        Level::Info,
                        format!("No config file found, generating default at {}", p.display()),
                    ));
                    if let Err(e) = generate_default_config(&p) {
                        config.notices.push(ConfigNotice::new(
                            Level::Warn,
                            format!("Failed to write default config: {e}"),
                        ));
                    }
                    return Ok(config);
                }
                p
            }
            None => {
                let mut config = MuseConfig::default();
                config.notices.push(ConfigNotice::new(
                    Level::Warn,
                    "Could not determine home directory, using default config",
                ));
                return Ok(config);
            }
        },
    };

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let mut config: MuseConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    let dump = format!("Config: {:?}", config);
    config.notices.push(ConfigNotice::new(
        Level::Info,
        format!("Loaded config from {}", path.display()),
    ));
    config.notices.push(ConfigNotice::new(Level::Debug, dump));
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) -> std::io::Result<()> {
    let default_content = r#"# Muse Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# default_feature = "code"          # "code" or "music"  (env: MUSE_FEATURE)
# log_file = "muse.log"
# log_level = "debug"               # "error", "warn", "info", "debug", "trace", "off"

# [backend]
# base_url = "http://localhost:3000" # env: MUSE_BASE_URL
# timeout_secs = 120                 # 0 waits forever
# usage_path = "api/usage"           # env: MUSE_USAGE_PATH; unset = no usage counter
"#;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, default_content)
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &MuseConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`], reading environment variables through `env`.
pub fn resolve_with_env(
    config: &MuseConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    let mut notices = config.notices.clone();

    // Feature: CLI → env → config → default
    let feature = cli
        .feature
        .or_else(|| {
            env("MUSE_FEATURE").and_then(|s| match s.parse::<Feature>() {
                Ok(f) => Some(f),
                Err(e) => {
                    notices.push(ConfigNotice::new(
                        Level::Warn,
                        format!("Ignoring MUSE_FEATURE: {e}"),
                    ));
                    None
                }
            })
        })
        .or(config.general.default_feature)
        .unwrap_or_default();

    // Base URL: CLI → env → config → default
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| env("MUSE_BASE_URL"))
        .or_else(|| config.backend.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Usage path: env → config
    let usage_path = env("MUSE_USAGE_PATH")
        .or_else(|| config.backend.usage_path.clone())
        .filter(|p| !p.trim().is_empty());

    let timeout = match config.backend.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS) {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };

    let log_level = config
        .general
        .log_level
        .as_deref()
        .and_then(|level| match level.parse::<log::LevelFilter>() {
            Ok(l) => Some(l),
            Err(_) => {
                notices.push(ConfigNotice::new(
                    Level::Warn,
                    format!("Unknown log level '{level}', using default"),
                ));
                None
            }
        })
        .unwrap_or(DEFAULT_LOG_LEVEL);

    ResolvedConfig {
        feature,
        base_url,
        timeout,
        usage_path,
        log_file: PathBuf::from(
            config
                .general
                .log_file
                .as_deref()
                .unwrap_or(DEFAULT_LOG_FILE),
        ),
        log_level,
        notices,
    }
}
