//! Configuration loading and constants.
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then environment variables, then command line overrides. `AppConfig` is the
//! root configuration struct. Keys can also be looked up by their colon path
//! (`Deployment:Marker`), which is how the status reporter reads them.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use const_format::formatcp;
use serde::Deserialize;

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Log target of this crate, used to build the default filter
pub const CRATE_LOG_TARGET: &str = "devops_demo_api";

/// Default log filter when neither `--log-level` nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = formatcp!("{}=info,tower_http=info", CRATE_LOG_TARGET);

/// Configuration file read when `--config` is not given and the file exists
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Environment name when none is configured
pub const DEFAULT_ENVIRONMENT: &str = "Production";

pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Seconds to wait for in-flight requests after a shutdown signal
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 30;

// =============================================================================
// HTTP Response Cache Control
// =============================================================================

/// Status responses are computed per request and must never be served from a cache
pub const CACHE_CONTROL_STATUS: &str = "no-store";

// =============================================================================
// Environment Variable Overrides
// =============================================================================

/// Variable holding the deployment environment name
pub const ENVIRONMENT_VAR: &str = "APP_ENVIRONMENT";

/// Separator between section and key in override variables (`DEPLOYMENT__MARKER`)
pub const ENV_SECTION_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Deployment environment name (e.g. "Staging", "Production")
    #[serde(default = "AppConfig::default_environment")]
    pub environment: String,
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Values stamped by the deployment pipeline
    #[serde(default)]
    pub deployment: DeploymentConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Self::default_environment(),
            http: HttpServerConfig::default(),
            deployment: DeploymentConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
    /// Grace period for connection draining on shutdown, in seconds
    #[serde(default = "HttpServerConfig::default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            shutdown_grace_seconds: Self::default_shutdown_grace(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }

    fn default_shutdown_grace() -> u64 {
        DEFAULT_SHUTDOWN_GRACE_SECS
    }

    /// Listen address in `host:port` form
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Deployment metadata supplied by the release pipeline. Both values are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeploymentConfig {
    /// Operator-supplied marker, e.g. a build or deployment identifier
    pub marker: Option<String>,
    /// Release version, takes precedence over the version baked in at build time
    pub version: Option<String>,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event, for log shippers
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::Validation(format!(
                "logging.format must be \"text\" or \"json\", got \"{}\"",
                other
            ))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => f.write_str("text"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

/// Overrides given on the command line; highest precedence.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub environment: Option<String>,
    pub port: Option<u16>,
}

impl AppConfig {
    fn default_environment() -> String {
        DEFAULT_ENVIRONMENT.to_string()
    }

    /// Load configuration from the process environment.
    ///
    /// Reads `path` if given (it must exist), otherwise `DEFAULT_CONFIG_PATH`
    /// when that file is present, otherwise starts from defaults.
    pub fn load(path: Option<&Path>, overrides: &CliOverrides) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => Some(path),
            None => Some(Path::new(DEFAULT_CONFIG_PATH)).filter(|p| p.exists()),
        };
        Self::from_sources(file, process_env_vars(), overrides)
    }

    /// Build configuration from explicit sources, applied in precedence order.
    pub fn from_sources<I, K, V>(
        file: Option<&Path>,
        env_vars: I,
        overrides: &CliOverrides,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(env_vars)?;
        config.apply_cli_overrides(overrides);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML configuration file without applying any overrides.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Apply `SECTION__KEY` style variables. Names are matched case-insensitively
    /// and unrelated variables are ignored.
    pub fn apply_env_overrides<I, K, V>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in vars {
            let key = key.as_ref().to_ascii_uppercase();
            let value: String = value.into();
            if key == ENVIRONMENT_VAR {
                self.environment = value;
                continue;
            }

            let Some((section, field)) = key.split_once(ENV_SECTION_SEPARATOR) else {
                continue;
            };
            match (section, field) {
                ("DEPLOYMENT", "MARKER") => self.deployment.marker = Some(value),
                ("DEPLOYMENT", "VERSION") => self.deployment.version = Some(value),
                ("HTTP", "HOST") => self.http.host = value,
                ("HTTP", "PORT") => {
                    self.http.port = value.trim().parse().map_err(|_| {
                        ConfigError::Validation(format!(
                            "{} must be a port number, got \"{}\"",
                            key, value
                        ))
                    })?;
                }
                ("HTTP", "SHUTDOWN_GRACE_SECONDS") => {
                    self.http.shutdown_grace_seconds = value.trim().parse().map_err(|_| {
                        ConfigError::Validation(format!(
                            "{} must be a number of seconds, got \"{}\"",
                            key, value
                        ))
                    })?;
                }
                ("LOGGING", "FORMAT") => self.logging.format = value.parse()?,
                _ => {}
            }
        }
        Ok(())
    }

    pub fn apply_cli_overrides(&mut self, overrides: &CliOverrides) {
        if let Some(environment) = &overrides.environment {
            self.environment = environment.clone();
        }
        if let Some(port) = overrides.port {
            self.http.port = port;
        }
    }

    /// Trim values and treat blank deployment values as unset
    fn normalize(&mut self) {
        self.environment = self.environment.trim().to_string();
        for value in [&mut self.deployment.marker, &mut self.deployment.version] {
            *value = value
                .take()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty());
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.environment.is_empty() {
            return Err(ConfigError::Validation(
                "environment name must not be empty".to_string(),
            ));
        }
        if self.http.host.trim().is_empty() {
            return Err(ConfigError::Validation(
                "http.host must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Look up a string setting by its colon-separated path, case-insensitively.
    ///
    /// Returns `None` for unknown keys and for unset values.
    pub fn get(&self, key: &str) -> Option<&str> {
        match key.trim().to_ascii_lowercase().as_str() {
            "environment" => Some(self.environment.as_str()),
            "deployment:marker" => self.deployment.marker.as_deref(),
            "deployment:version" => self.deployment.version.as_deref(),
            "http:host" => Some(self.http.host.as_str()),
            _ => None,
        }
    }
}

/// Process environment as UTF-8 pairs; variables that are not valid UTF-8 are skipped.
fn process_env_vars() -> impl Iterator<Item = (String, String)> {
    std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}
