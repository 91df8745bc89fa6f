//! Shared helpers for the end-to-end tests of `ci-dispatch`.

use ci_dispatch::config::DispatcherConfig;
use std::path::{Path, PathBuf};

/// Path to a configuration file in `tests/fixtures`.
pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Load a configuration file from `tests/fixtures`.
pub fn fixture_config(name: &str) -> DispatcherConfig {
    DispatcherConfig::from_file(&fixture(name)).expect("failed to load fixture configuration")
}
