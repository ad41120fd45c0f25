//! Deployment status reporting.
//!
//! `StatusReporter` gathers process and deployment facts on every call and
//! assembles them into a [`StatusRecord`]. Nothing is cached between calls:
//! configuration and the host probe are read-only and shared, the record is
//! built fresh and handed to the caller.

use std::io;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::build_info::{self, FALLBACK_VERSION};
use crate::config::AppConfig;
use crate::error::AppError;

/// Name reported by every instance regardless of configuration
pub const APPLICATION_NAME: &str = "DevOpsDemoApi";

/// Configuration key holding the deployment marker
pub const MARKER_CONFIG_KEY: &str = "Deployment:Marker";

/// Configuration key holding a release version override
pub const VERSION_CONFIG_KEY: &str = "Deployment:Version";

/// Marker reported when `Deployment:Marker` is unset
pub const MARKER_NOT_SET: &str = "Marker_Not_Set";

/// Operational facts returned by `GET /status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatusRecord {
    pub application_name: String,
    pub version: String,
    pub environment: String,
    pub host_name: String,
    /// ISO-8601 UTC timestamp with 100ns precision, e.g. `2024-05-01T12:00:00.1234567Z`
    pub server_time: String,
    pub process_id: u32,
    /// Compiler and target that produced the running binary
    pub framework: String,
    pub configuration_marker: String,
}

/// Source of the host facts that come from the operating system.
pub trait HostProbe: Send + Sync {
    /// Local network host name.
    fn host_name(&self) -> io::Result<String>;

    /// Identifier of the running server process.
    fn process_id(&self) -> u32 {
        std::process::id()
    }
}

/// Probe backed by the local operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalHost;

impl HostProbe for LocalHost {
    fn host_name(&self) -> io::Result<String> {
        Ok(hostname::get()?.to_string_lossy().into_owned())
    }
}

/// Builds a [`StatusRecord`] per request from configuration and host facts.
#[derive(Clone)]
pub struct StatusReporter {
    config: Arc<AppConfig>,
    probe: Arc<dyn HostProbe>,
    release_version: Option<&'static str>,
}

impl StatusReporter {
    /// Reporter for the local host using the version baked in at build time.
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self::with_probe(config, Arc::new(LocalHost))
    }

    pub fn with_probe(config: Arc<AppConfig>, probe: Arc<dyn HostProbe>) -> Self {
        Self {
            config,
            probe,
            release_version: build_info::release_version(),
        }
    }

    /// Replace the build-time release version (`None` behaves like a build
    /// without `APP_RELEASE_VERSION`).
    pub fn with_release_version(mut self, release_version: Option<&'static str>) -> Self {
        self.release_version = release_version;
        self
    }

    /// Collect the current status.
    ///
    /// Emits one `INFO` event carrying the reported version and environment.
    /// Fails only when the host name cannot be resolved.
    pub fn report(&self) -> Result<StatusRecord, AppError> {
        let record = StatusRecord {
            application_name: APPLICATION_NAME.to_string(),
            version: resolve_version(self.config.get(VERSION_CONFIG_KEY), self.release_version),
            environment: self.config.environment.clone(),
            host_name: self.probe.host_name().map_err(AppError::HostName)?,
            server_time: format_server_time(Utc::now()),
            process_id: self.probe.process_id(),
            framework: build_info::framework_description(),
            configuration_marker: self
                .config
                .get(MARKER_CONFIG_KEY)
                .unwrap_or(MARKER_NOT_SET)
                .to_string(),
        };

        tracing::info!(
            version = %record.version,
            environment = %record.environment,
            "Status endpoint accessed"
        );

        Ok(record)
    }
}

/// Pick the reported version: configuration, then build metadata, then the
/// development placeholder.
pub fn resolve_version(configured: Option<&str>, built: Option<&str>) -> String {
    configured
        .or(built)
        .unwrap_or(FALLBACK_VERSION)
        .to_string()
}

/// Round-trip UTC timestamp with seven fractional digits and a `Z` suffix.
pub fn format_server_time(now: DateTime<Utc>) -> String {
    // Leap seconds report nanos >= 1e9; clamp so the field stays seven digits
    let ticks = (now.timestamp_subsec_nanos() / 100).min(9_999_999);
    format!("{}.{:07}Z", now.format("%Y-%m-%dT%H:%M:%S"), ticks)
}
