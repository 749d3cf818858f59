use std::process::Command;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about = "Project automation commands", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the test suite with cargo nextest
    Test {
        #[arg(long)]
        release: bool,
    },
    /// Check formatting and run clippy over the workspace
    Lint {
        /// Apply rustfmt fixes instead of only checking
        #[arg(long)]
        fix: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Test { release } => run_tests(release),
        Commands::Lint { fix } => run_lint(fix),
    }
}

fn run_tests(release: bool) -> Result<()> {
    let mut args = vec!["nextest", "run", "--workspace"];
    if release {
        args.push("--release");
    }
    run("cargo", &args)
}

fn run_lint(fix: bool) -> Result<()> {
    if fix {
        run("cargo", &["fmt", "--all"])?;
    } else {
        run("cargo", &["fmt", "--all", "--check"])?;
    }
    run(
        "cargo",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    )
}

fn run(program: &str, args: &[&str]) -> Result<()> {
    let status = Command::new(program)
        .args(args)
        .status()
        .with_context(|| format!("failed to launch {program}"))?;
    if !status.success() {
        bail!("{program} {} exited with {status}", args.join(" "));
    }
    Ok(())
}
