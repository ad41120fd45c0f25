//! Build-time metadata baked into the binary.
//!
//! The release version is injected by the pipeline through the
//! `APP_RELEASE_VERSION` environment variable at compile time. The runtime
//! description comes from `build.rs`.

/// Version reported when neither configuration nor the build supplies one.
pub const FALLBACK_VERSION: &str = "1.0.0-dev";

/// Release version injected at build time, if any.
pub const RELEASE_VERSION: Option<&str> = option_env!("APP_RELEASE_VERSION");

/// `rustc --version` output of the compiler that built this binary.
pub const RUSTC_VERSION: &str = env!("BUILD_RUSTC_VERSION");

/// Target triple this binary was compiled for.
pub const TARGET: &str = env!("BUILD_TARGET");

/// Release version baked into the binary, ignoring blank values.
pub fn release_version() -> Option<&'static str> {
    RELEASE_VERSION
        .map(str::trim)
        .filter(|version| !version.is_empty())
}

/// Description of the runtime executing the server, e.g.
/// `rustc 1.83.0 (90b35a623 2024-11-26) (x86_64-unknown-linux-gnu)`.
pub fn framework_description() -> String {
    format!("{} ({})", RUSTC_VERSION, TARGET)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framework_description_names_compiler_and_target() {
        let description = framework_description();
        assert!(description.starts_with(RUSTC_VERSION));
        assert!(description.ends_with(&format!("({})", TARGET)));
        assert!(!description.trim().is_empty());
    }

    #[test]
    fn test_release_version_is_never_blank() {
        if let Some(version) = release_version() {
            assert!(!version.is_empty());
            assert_eq!(version, version.trim());
        }
    }
}
