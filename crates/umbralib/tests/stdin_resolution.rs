//! Scenario tests for `stdin-filename` handling across configuration
//! loading, validation, and path resolution.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use umbralib::config::{Config, validate_stdin_src};
use umbralib::errors::ConfigError;
use umbralib::paths::resolve_paths;
use umbralib::testing::{Expectation, check_expectation, check_outcome};

const SECTION: &str = "umbralib";

/// Run the front-end flow for one scenario: load configuration, fall back
/// to configured sources when none are given on the command line, validate
/// the stdin/source exclusion, and resolve the final path set.
fn resolve_scenario(
    project: &Path,
    config_src: Option<&[&str]>,
    src: &[&str],
    stdin_filename: Option<&str>,
) -> Result<BTreeSet<PathBuf>, ConfigError> {
    if let Some(entries) = config_src {
        let document = format!("[tool.umbralib]\nsrc = {entries:?}\n");
        fs::write(project.join("umbra.toml"), document).expect("write configuration");
    }

    let src: Vec<String> = src.iter().map(|entry| entry.to_string()).collect();
    let config_path = if src.is_empty() && config_src.is_some() {
        Some(project.display().to_string())
    } else {
        None
    };
    let config = Config::load(config_path.as_deref(), &src, SECTION)?;

    let effective_src = if src.is_empty() { config.src } else { src };
    validate_stdin_src(stdin_filename, &effective_src)?;

    let (paths, _) = resolve_paths(stdin_filename, &effective_src);
    Ok(paths)
}

fn path_set(paths: &[&str]) -> BTreeSet<PathBuf> {
    paths.iter().map(PathBuf::from).collect()
}

#[test]
fn sources_pass_through_without_stdin_filename() {
    let temp = tempfile::tempdir().expect("tempdir");
    let project = temp.path();
    let project_arg = |name: &str| project.join(name).display().to_string();

    check_expectation(
        &Expectation::Value(path_set(&[&project_arg("a.rs")])),
        &[],
        || resolve_scenario(project, None, &[&project_arg("a.rs")], None),
    );
}

#[test]
fn configured_sources_apply_when_none_are_given() {
    let temp = tempfile::tempdir().expect("tempdir");

    check_expectation(
        &Expectation::Value(path_set(&["x.rs", "y.rs"])),
        &[],
        || resolve_scenario(temp.path(), Some(&["x.rs", "y.rs"]), &[], None),
    );
}

#[test]
fn command_line_sources_override_configured_ones() {
    let temp = tempfile::tempdir().expect("tempdir");
    let project = temp.path();
    let cli_arg = project.join("a.rs").display().to_string();

    check_expectation(
        &Expectation::Value(path_set(&[&cli_arg])),
        &[],
        || resolve_scenario(project, Some(&["b.rs"]), &[&cli_arg], None),
    );
}

#[test]
fn duplicate_configured_sources_collapse_to_one_path() {
    let temp = tempfile::tempdir().expect("tempdir");

    check_expectation(
        &Expectation::Value(path_set(&["x.rs"])),
        &[],
        || resolve_scenario(temp.path(), Some(&["x.rs", "x.rs"]), &[], None),
    );
}

#[test]
fn stdin_filename_alone_resolves_to_itself() {
    let temp = tempfile::tempdir().expect("tempdir");

    check_expectation(
        &Expectation::Value(path_set(&["a.rs"])),
        &[],
        || resolve_scenario(temp.path(), None, &[], Some("a.rs")),
    );
}

#[test]
fn stdin_filename_conflicts_with_command_line_sources() {
    let temp = tempfile::tempdir().expect("tempdir");

    check_outcome(&Expectation::Instance(ConfigError::StdinConflict), || {
        resolve_scenario(temp.path(), None, &["a.rs"], Some("a.rs"))
    });
}

#[test]
fn stdin_filename_conflicts_with_configured_sources() {
    let temp = tempfile::tempdir().expect("tempdir");

    check_outcome(&Expectation::Instance(ConfigError::StdinConflict), || {
        resolve_scenario(temp.path(), Some(&["b.rs"]), &[], Some("a.rs"))
    });
}

#[test]
fn stdin_filename_conflicts_with_both_kinds_of_sources() {
    let temp = tempfile::tempdir().expect("tempdir");

    check_outcome(&Expectation::Instance(ConfigError::StdinConflict), || {
        resolve_scenario(temp.path(), Some(&["b.rs"]), &["a.rs"], Some("a.rs"))
    });
}

#[test]
fn resolved_paths_share_a_common_root_on_disk() {
    let temp = tempfile::tempdir().expect("tempdir");
    let project = temp.path().join("tree");
    fs::create_dir_all(project.join("left")).expect("mkdir");
    fs::create_dir_all(project.join("right")).expect("mkdir");
    fs::write(project.join("left/a.rs"), "").expect("write");
    fs::write(project.join("right/b.rs"), "").expect("write");

    let src = vec![
        project.join("left/a.rs").display().to_string(),
        project.join("right/b.rs").display().to_string(),
    ];
    let (paths, common_root) = resolve_paths(None, &src);
    assert_eq!(paths.len(), 2);
    assert_eq!(common_root, project);
}
