//! HTTP server module.
//!
//! Serves the router over plain HTTP and drains connections gracefully on
//! SIGTERM/SIGINT. TLS is expected to be terminated by the load balancer or
//! ingress in front of the service.

mod server;
mod shutdown;

pub use server::{start_server, ServerError};
