//! DevOpsDemoApi: deployment status service.
//!
//! Exposes `GET /status`, which reports the application name, release
//! version, deployment environment, host name, server time, process id,
//! runtime description and an operator-supplied configuration marker.
//! Release pipelines hit it after a rollout to confirm which build is live
//! in which environment.

pub mod build_info;
pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod status;

pub use config::{AppConfig, CliOverrides, ConfigError};
pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
pub use status::{HostProbe, LocalHost, StatusRecord, StatusReporter};
