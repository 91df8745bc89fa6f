use crate::payload::PayloadFormat;
use crate::target::{RemoteTarget, TargetError};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read configuration file `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration file `{}`", path.display())]
    #[diagnostic(help("configuration files are written in RON, see `ci-dispatch --print-config`"))]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error(transparent)]
    #[diagnostic(transparent)]
    Target(#[from] TargetError),
    #[error("failed to serialize configuration")]
    Serialize(#[from] ron::Error),
}

/// Where the dispatcher finds its two collaborators, and what it hands them.
///
/// All fields are optional in a configuration file. Missing fields take the values of the CI setup
/// the dispatcher was written for: the debug build of the compiler is copied into the `ci`
/// container, and tests are requested through the gRPC client script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatcherConfig {
    /// The container runtime used for the upload.
    pub runtime: String,
    /// The locally built compiler.
    pub artifact: PathBuf,
    /// Where the compiler is placed, as `<container>:<path>`.
    pub destination: String,
    /// The interpreter running the remote test script.
    pub interpreter: String,
    /// The script that requests a single test run from the remote host.
    pub script: PathBuf,
    pub payload_format: PayloadFormat,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            runtime: "docker".to_owned(),
            artifact: PathBuf::from("./target/debug/compiler"),
            destination: "ci:/test/data/compiler".to_owned(),
            interpreter: "python3".to_owned(),
            script: PathBuf::from("./ci/grpc/call.py"),
            payload_format: PayloadFormat::Flagged,
        }
    }
}

impl DispatcherConfig {
    /// Load the configuration from a RON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let config = Self::from_ron(&source).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        config.remote_target()?;
        Ok(config)
    }

    pub fn from_ron(source: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(source)
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        let config = ron::ser::PrettyConfig::default().struct_names(true);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// The parsed upload destination.
    pub fn remote_target(&self) -> Result<RemoteTarget, TargetError> {
        RemoteTarget::parse(&self.destination)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ConfigError, DispatcherConfig};
    use crate::payload::PayloadFormat;
    use std::path::Path;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = DispatcherConfig::from_ron(
            r#"(
                interpreter: "echo",
                payload_format: Bare,
            )"#,
        )
        .expect("config should parse");
        assert_eq!(config.interpreter, "echo");
        assert_eq!(config.payload_format, PayloadFormat::Bare);
        assert_eq!(config.runtime, "docker");
        assert_eq!(config.destination, "ci:/test/data/compiler");
        assert_eq!(config.script, Path::new("./ci/grpc/call.py"));
    }

    #[test]
    fn test_named_struct_is_accepted() {
        let config = DispatcherConfig::from_ron(r#"DispatcherConfig(runtime: "podman")"#)
            .expect("config should parse");
        assert_eq!(config.runtime, "podman");
    }

    #[test]
    fn test_printed_config_loads_back() {
        let config = DispatcherConfig::default();
        let source = config.to_ron().expect("config should serialize");
        assert!(source.starts_with("DispatcherConfig("));
        assert_eq!(
            DispatcherConfig::from_ron(&source).expect("printed config should parse"),
            config
        );
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        assert!(DispatcherConfig::from_ron(r#"(runtim: "podman")"#).is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = DispatcherConfig::from_file(Path::new("/nonexistent/ci-dispatch.ron"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
