//! Load, validate, and render configuration in TOML format.

use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::fs;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use anyhow::Context;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::Level;

use crate::errors::ConfigError;
use crate::paths::find_project_root;

/// Name of the configuration file discovered at the project root.
pub const CONFIG_FILE_NAME: &str = "umbra.toml";

/// Configuration options shared by the formatter and linter front ends,
/// read from the `[tool.<section>]` table of an `umbra.toml` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Files and directories to process.
    pub src: Vec<String>,
    /// Revision to compare against when picking changed lines.
    pub revision: String,
    /// Write the processed content to standard output.
    pub stdout: bool,
    /// Explicit configuration file or directory, if one was given.
    pub config: Option<String>,
    /// Log level name, validated at load time.
    pub log_level: Option<String>,
    /// Force colored output on or off; unset means auto-detect.
    pub color: Option<bool>,
    /// Number of parallel worker processes.
    pub workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            src: Vec::new(),
            revision: "HEAD".to_owned(),
            stdout: false,
            config: None,
            log_level: None,
            color: None,
            workers: 1,
        }
    }
}

impl Config {
    /// Find and load configuration from a TOML configuration file.
    ///
    /// The location is determined by trying, in order: the file named by
    /// `path`; `umbra.toml` inside the directory named by `path`;
    /// `umbra.toml` at the project root discovered from `srcs` (the working
    /// directory when `srcs` is empty). An explicit `path` which resolves to
    /// no file is an error; a missing discovered file just yields the
    /// built-in defaults, as does a missing `[tool.<section>]` table.
    pub fn load(
        path: Option<&str>,
        srcs: &[String],
        section_name: &str,
    ) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(given) => {
                let given_path = PathBuf::from(given);
                let candidates = [given_path.clone(), given_path.join(CONFIG_FILE_NAME)];
                match candidates.into_iter().find(|candidate| candidate.is_file()) {
                    Some(found) => found,
                    None => {
                        let missing = if given_path.is_dir() || given.ends_with(MAIN_SEPARATOR) {
                            given_path.join(CONFIG_FILE_NAME)
                        } else {
                            given_path
                        };
                        return Err(ConfigError::FileNotFound { path: missing });
                    }
                }
            }
            None => {
                let discovered = find_project_root(srcs).join(CONFIG_FILE_NAME);
                if !discovered.is_file() {
                    return Ok(Config::default());
                }
                discovered
            }
        };
        Self::from_file(&config_path, section_name)
    }

    fn from_file(path: &Path, section_name: &str) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let document: toml::Value = toml::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let section = document
            .get("tool")
            .and_then(|tool| tool.get(section_name))
            .cloned();
        let config = match section {
            Some(value) => value.try_into().map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?,
            None => Config::default(),
        };
        // Surface a bad log level at load time.
        let _ = config.log_level()?;
        Ok(config)
    }

    /// Parse the configured log level into a [`tracing::Level`].
    ///
    /// Numeric levels (`"1"` through `"5"`) are accepted alongside names.
    pub fn log_level(&self) -> Result<Option<Level>, ConfigError> {
        match &self.log_level {
            None => Ok(None),
            Some(level) => level
                .parse::<Level>()
                .map(Some)
                .map_err(|_| ConfigError::InvalidLogLevel {
                    level: level.clone(),
                }),
        }
    }

    /// Configuration options which are set to non-default values.
    pub fn modified_fields(&self) -> BTreeMap<&'static str, Value> {
        let defaults = Config::default();
        let mut modified = BTreeMap::new();
        if self.src != defaults.src {
            modified.insert("src", json!(self.src));
        }
        if self.revision != defaults.revision {
            modified.insert("revision", json!(self.revision));
        }
        if self.stdout != defaults.stdout {
            modified.insert("stdout", json!(self.stdout));
        }
        if self.config != defaults.config {
            modified.insert("config", json!(self.config));
        }
        if self.log_level != defaults.log_level {
            modified.insert("log_level", json!(self.log_level));
        }
        if self.color != defaults.color {
            modified.insert("color", json!(self.color));
        }
        if self.workers != defaults.workers {
            modified.insert("workers", json!(self.workers));
        }
        modified
    }

    /// Render the configuration as a TOML document headed by
    /// `[tool.<section>]`. Unset options are omitted.
    pub fn dump(&self, section_name: &str) -> String {
        dump_fields(&self.as_fields(), section_name)
    }

    fn as_fields(&self) -> Vec<(&'static str, Value)> {
        let mut fields = vec![
            ("src", json!(self.src)),
            ("revision", json!(self.revision)),
            ("stdout", json!(self.stdout)),
        ];
        if let Some(config) = &self.config {
            fields.push(("config", json!(config)));
        }
        if let Some(log_level) = &self.log_level {
            fields.push(("log_level", json!(log_level)));
        }
        if let Some(color) = self.color {
            fields.push(("color", json!(color)));
        }
        fields.push(("workers", json!(self.workers)));
        fields
    }
}

/// Render configuration entries under a `[tool.<section>]` header, with
/// array values one item per line.
fn dump_fields(fields: &[(&str, Value)], section_name: &str) -> String {
    let mut out = format!("[tool.{section_name}]\n");
    for (key, value) in fields {
        out.push_str(key);
        out.push_str(" = ");
        out.push_str(&format_value(value));
        out.push('\n');
    }
    out
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Array(items) => {
            let mut rendered = String::from("[");
            for item in items {
                rendered.push_str("\n    ");
                rendered.push_str(&format_value(item));
                rendered.push(',');
            }
            rendered.push_str("\n]");
            rendered
        }
        scalar => scalar.to_string(),
    }
}

/// Log the effective configuration and the non-default subset when debug
/// logging is enabled.
pub fn log_config_if_debug(config: &Config, section_name: &str) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }
    tracing::debug!(
        "Effective configuration:\n{}",
        config.dump(section_name)
    );
    let modified: Vec<(&str, Value)> = config.modified_fields().into_iter().collect();
    tracing::debug!(
        "Configuration options which differ from defaults:\n{}",
        dump_fields(&modified, section_name)
    );
}

/// The output mode to use: no output, a unified diff, or the full content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Nothing,
    Diff,
    Content,
}

impl OutputMode {
    /// Resolve the output mode from the `diff` and `stdout` options.
    pub fn from_args(diff: bool, stdout: bool) -> Result<Self, ConfigError> {
        Self::validate_diff_stdout(diff, stdout)?;
        if diff {
            return Ok(Self::Diff);
        }
        if stdout {
            return Ok(Self::Content);
        }
        Ok(Self::Nothing)
    }

    /// The `diff` and `stdout` options are mutually exclusive.
    pub fn validate_diff_stdout(diff: bool, stdout: bool) -> Result<(), ConfigError> {
        if diff && stdout {
            return Err(ConfigError::DiffStdoutConflict);
        }
        Ok(())
    }

    /// In `stdout` mode exactly one input must be provided: either
    /// `stdin-filename`, or a single source file which exists on disk.
    pub fn validate_stdout_src(
        stdout: bool,
        src: &[String],
        stdin_filename: Option<&str>,
    ) -> Result<(), ConfigError> {
        if !stdout {
            return Ok(());
        }
        if stdin_filename.is_none() && src.len() == 1 && Path::new(&src[0]).is_file() {
            return Ok(());
        }
        if stdin_filename.is_some() && src.is_empty() {
            return Ok(());
        }
        Err(ConfigError::StdoutSourceCount)
    }
}

/// When `stdin-filename` is given, no source paths may be listed.
pub fn validate_stdin_src(stdin_filename: Option<&str>, src: &[String]) -> Result<(), ConfigError> {
    if stdin_filename.is_none() || src.is_empty() {
        return Ok(());
    }
    Err(ConfigError::StdinConflict)
}

/// Snapshot of the environment variables which can override the `color`
/// setting.
#[derive(Debug, Default, Clone)]
pub struct ColorEnv {
    umbra_colors: Option<String>,
    no_color: bool,
    force_color: bool,
}

impl ColorEnv {
    pub fn from_env() -> Self {
        Self {
            umbra_colors: env::var("UMBRA_COLORS").ok(),
            no_color: env::var_os("NO_COLOR").is_some(),
            force_color: env::var_os("FORCE_COLOR").is_some(),
        }
    }

    #[cfg(test)]
    fn for_tests(umbra_colors: Option<&str>, no_color: bool, force_color: bool) -> Self {
        Self {
            umbra_colors: umbra_colors.map(str::to_owned),
            no_color,
            force_color,
        }
    }
}

/// Override `color` from the environment: `UMBRA_COLORS` set to `"0"` or
/// `"1"` wins; otherwise `NO_COLOR` forces color off and `FORCE_COLOR`
/// forces it on.
pub fn override_color_with_environment(mut config: Config, env: &ColorEnv) -> Config {
    match env.umbra_colors.as_deref() {
        Some("0") => config.color = Some(false),
        Some("1") => config.color = Some(true),
        _ => {
            if env.no_color {
                config.color = Some(false);
            } else if env.force_color {
                config.color = Some(true);
            }
        }
    }
    config
}

/// File exclusion patterns for pre-processing passes.
///
/// Each pass skips files matching at least one of its glob patterns; an
/// empty pattern set means the pass runs for every file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exclusions {
    pub format: BTreeSet<String>,
    pub imports: BTreeSet<String>,
    pub lint: BTreeSet<String>,
}

/// Compile one exclusion pattern set into a matcher.
pub fn build_exclusion_matcher(patterns: &BTreeSet<String>) -> anyhow::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob =
            Glob::new(pattern).with_context(|| format!("invalid exclusion pattern `{pattern}`"))?;
        builder.add(glob);
    }
    builder.build().context("failed to build exclusion matcher")
}
