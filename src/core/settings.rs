//! Engine settings and the loader that merges them from files and environment.

use crate::error::{ConfigError, Result};
use config::{Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default per-attempt budget for network checks.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Default endpoint probed by the OAuth credential check.
pub const DEFAULT_OAUTH_ENDPOINT: &str = "https://api.github.com/";

/// What the reachability check does with a scheme other than `http`/`https`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownSchemePolicy {
    /// Report success without attempting a connection.
    #[default]
    Permit,
    /// Report an `UnsupportedScheme` failure.
    Reject,
}

/// Settings for the reachability check.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReachabilitySettings {
    /// Connect plus handshake budget in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Handling of unrecognized schemes
    #[serde(default)]
    pub unknown_scheme: UnknownSchemePolicy,
}

impl ReachabilitySettings {
    /// The configured timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ReachabilitySettings {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            unknown_scheme: UnknownSchemePolicy::default(),
        }
    }
}

/// Settings for the OAuth credential check.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OAuthSettings {
    /// URL that must answer 200 to an authenticated GET
    #[serde(default = "default_oauth_endpoint")]
    pub endpoint: String,
}

impl Default for OAuthSettings {
    fn default() -> Self {
        Self {
            endpoint: default_oauth_endpoint(),
        }
    }
}

/// Settings of the validation engine itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Reachability check settings
    #[serde(default)]
    pub reachability: ReachabilitySettings,
    /// OAuth check settings
    #[serde(default)]
    pub oauth: OAuthSettings,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT.as_millis() as u64
}

fn default_oauth_endpoint() -> String {
    DEFAULT_OAUTH_ENDPOINT.to_string()
}

/// Loads [`Settings`] with standard precedence: files in the order given, then
/// environment variables.
///
/// # Examples
///
/// ```rust,no_run
/// use preflight_config::core::SettingsLoader;
///
/// # fn example() -> preflight_config::error::Result<()> {
/// // PREFLIGHT_REACHABILITY__TIMEOUT_MS=500 -> reachability.timeout_ms = 500
/// let settings = SettingsLoader::new()
///     .with_file("config/preflight.yaml")
///     .with_env_overrides("PREFLIGHT", "__")
///     .load()?;
/// # Ok(())
/// # }
/// ```
pub struct SettingsLoader {
    file_paths: Vec<PathBuf>,
    env_prefix: Option<String>,
    env_separator: Option<String>,
}

impl SettingsLoader {
    /// Create a loader with no sources; loading it yields defaults.
    pub fn new() -> Self {
        Self {
            file_paths: Vec::new(),
            env_prefix: None,
            env_separator: None,
        }
    }

    /// Add a settings file. Later files override earlier ones.
    ///
    /// Supported formats: YAML (.yaml, .yml), TOML (.toml), JSON (.json)
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_paths.push(path.into());
        self
    }

    /// Add environment variable overrides.
    ///
    /// # Arguments
    ///
    /// * `prefix` - Prefix for environment variables (e.g., "PREFLIGHT")
    /// * `separator` - Separator for nested keys (e.g., "__")
    pub fn with_env_overrides(mut self, prefix: &str, separator: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self.env_separator = Some(separator.to_string());
        self
    }

    /// Load and merge all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A file has an unsupported extension or does not exist
    /// - A source fails to parse
    /// - The merged values do not deserialize into [`Settings`]
    pub fn load(&self) -> Result<Settings> {
        let mut builder = config::Config::builder();

        for path in &self.file_paths {
            validate_extension(path)?;
            if !path.exists() {
                return Err(ConfigError::LoadError(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path.clone()).required(true));
        }

        if let (Some(prefix), Some(separator)) = (&self.env_prefix, &self.env_separator) {
            builder = builder.add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator(separator)
                    .try_parsing(true),
            );
        }

        let config = builder
            .build()
            .map_err(|e| ConfigError::LoadError(format!("Failed to build configuration: {}", e)))?;

        let settings = config.try_deserialize::<Settings>().map_err(|e| {
            ConfigError::DeserializationError(format!("Failed to deserialize settings: {}", e))
        })?;

        tracing::debug!(
            sources = self.file_paths.len(),
            timeout_ms = settings.reachability.timeout_ms,
            "Loaded preflight settings"
        );
        Ok(settings)
    }
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_extension(path: &std::path::Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| {
            ConfigError::LoadError(format!(
                "Unable to determine file format for: {}",
                path.display()
            ))
        })?;

    match extension {
        "yaml" | "yml" | "toml" | "json" => Ok(()),
        _ => Err(ConfigError::LoadError(format!(
            "Unsupported file extension: {}. Supported: .yaml, .yml, .toml, .json",
            extension
        ))),
    }
}
