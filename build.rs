//! Build script for devops-demo-api.
//!
//! Records the compiler version and target triple so the status endpoint can
//! describe the runtime without introspection, and re-runs whenever the
//! release version injected by the pipeline changes.

use std::process::Command;

fn main() {
    let rustc = std::env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let rustc_version = Command::new(rustc)
        .arg("--version")
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|version| version.trim().to_string())
        .filter(|version| !version.is_empty())
        .unwrap_or_else(|| "rustc (unknown version)".to_string());

    let target = std::env::var("TARGET").unwrap_or_else(|_| "unknown-target".to_string());

    println!("cargo:rustc-env=BUILD_RUSTC_VERSION={}", rustc_version);
    println!("cargo:rustc-env=BUILD_TARGET={}", target);

    // Release pipelines set this during `cargo build`; see build_info.rs
    println!("cargo:rerun-if-env-changed=APP_RELEASE_VERSION");
    println!("cargo:rerun-if-changed=build.rs");
}
