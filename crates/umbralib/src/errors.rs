//! Error types shared by the formatter and linter front ends.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use serde_json::{Value, json};
use thiserror::Error;

use crate::testing::InspectableError;

/// Errors raised while locating, reading, or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file named by the `config` option does not exist.
    #[error("Configuration file {} not found", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("No source files are allowed when using the `stdin-filename` option")]
    StdinConflict,

    #[error("The `diff` and `stdout` options can't both be enabled")]
    DiffStdoutConflict,

    #[error(
        "Either `stdin-filename` or exactly one source file which exists on disk must be \
         provided when using the `stdout` option"
    )]
    StdoutSourceCount,

    #[error("Failed to read configuration from {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid TOML in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid log level `{level}` in configuration")]
    InvalidLogLevel { level: String },
}

/// Discriminant for [`ConfigError`] variants, used by test expectations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigErrorKind {
    FileNotFound,
    StdinConflict,
    DiffStdoutConflict,
    StdoutSourceCount,
    Read,
    Parse,
    InvalidLogLevel,
}

impl ConfigError {
    pub fn kind(&self) -> ConfigErrorKind {
        match self {
            ConfigError::FileNotFound { .. } => ConfigErrorKind::FileNotFound,
            ConfigError::StdinConflict => ConfigErrorKind::StdinConflict,
            ConfigError::DiffStdoutConflict => ConfigErrorKind::DiffStdoutConflict,
            ConfigError::StdoutSourceCount => ConfigErrorKind::StdoutSourceCount,
            ConfigError::Read { .. } => ConfigErrorKind::Read,
            ConfigError::Parse { .. } => ConfigErrorKind::Parse,
            ConfigError::InvalidLogLevel { .. } => ConfigErrorKind::InvalidLogLevel,
        }
    }
}

impl InspectableError for ConfigError {
    type Kind = ConfigErrorKind;

    fn kind(&self) -> ConfigErrorKind {
        ConfigError::kind(self)
    }

    fn fields(&self) -> BTreeMap<&'static str, Value> {
        match self {
            ConfigError::FileNotFound { path }
            | ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. } => {
                BTreeMap::from([("path", json!(path.display().to_string()))])
            }
            ConfigError::InvalidLogLevel { level } => BTreeMap::from([("level", json!(level))]),
            ConfigError::StdinConflict
            | ConfigError::DiffStdoutConflict
            | ConfigError::StdoutSourceCount => BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::testing::matching_attrs;

    #[test]
    fn file_not_found_names_the_missing_file() {
        let err = ConfigError::FileNotFound {
            path: PathBuf::from("project/umbra.toml"),
        };
        assert_eq!(
            err.to_string(),
            "Configuration file project/umbra.toml not found"
        );
        assert_eq!(err.kind(), ConfigErrorKind::FileNotFound);
    }

    #[test]
    fn payload_fields_are_inspectable() {
        let err = ConfigError::InvalidLogLevel {
            level: "verbose".into(),
        };
        let attrs = matching_attrs(&err, &["level"]);
        assert_eq!(attrs.get("level"), Some(&json!("verbose")));
    }

    #[test]
    fn unit_variants_expose_no_fields() {
        assert!(InspectableError::fields(&ConfigError::StdinConflict).is_empty());
        assert!(InspectableError::fields(&ConfigError::DiffStdoutConflict).is_empty());
    }
}
