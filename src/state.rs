//! Shared application state for request handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::status::StatusReporter;

/// Shared application state, cloneable across handlers.
///
/// Holds the status reporter, which itself shares the read-only configuration
/// and host probe behind `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub reporter: StatusReporter,
}

impl AppState {
    /// Creates state that reports on the local host with the build-time version.
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self::with_reporter(StatusReporter::new(config))
    }

    /// Creates state around an existing reporter.
    pub fn with_reporter(reporter: StatusReporter) -> Self {
        Self { reporter }
    }
}
