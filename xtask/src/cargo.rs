use anyhow::{Context, Result};
use colored::Colorize;
use std::process::{Command, Output};
use std::time::Instant;

/// Feature combinations the shim must build with on every target.
pub const FEATURE_SETS: &[&str] = &["", "stereo", "custom-support", "stereo,custom-support"];

/// Feature combinations that need the pinned libopus on the link path.
pub const LINK_FEATURE_SETS: &[&str] = &["link", "stereo,link"];

/// Workspace-wide clippy run; warnings are errors so the workspace lint
/// table is enforced.
pub const CLIPPY_ARGS: &[&str] = &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"];

/// Formatting check across the workspace.
pub const FMT_ARGS: &[&str] = &["fmt", "--all", "--check"];

/// Run `cargo <args>` for `opus-shim` with `features`, printing a one-line
/// status. Returns the captured output on success.
pub fn step(label: &str, args: &[&str], features: &str) -> Result<Output> {
    let mut cmd = Command::new("cargo");
    cmd.args(args).args(["-p", "opus-shim"]);
    if !features.is_empty() {
        cmd.args(["--features", features]);
    }
    execute(&format!("{label} [{}]", describe(features)), args, cmd)
}

/// Run `cargo <args>` unchanged (workspace-wide commands, other packages).
pub fn workspace_step(label: &str, args: &[&str]) -> Result<Output> {
    let mut cmd = Command::new("cargo");
    cmd.args(args);
    execute(label, args, cmd)
}

fn execute(label: &str, args: &[&str], mut cmd: Command) -> Result<Output> {
    println!("{}", format!("  {label}...").cyan());
    let start = Instant::now();

    let output = cmd
        .output()
        .with_context(|| format!("Failed to run cargo {}", args.join(" ")))?;

    if !output.status.success() {
        eprintln!("{}", format!("  ✗ {label} failed").red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&output.stdout));
        eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        anyhow::bail!("{label} failed");
    }

    println!(
        "{}",
        format!(
            "  ✓ {label} passed in {:.2}s",
            start.elapsed().as_secs_f64()
        )
        .green()
    );
    Ok(output)
}

/// Human-readable feature list; the empty set is the mono default.
pub fn describe(features: &str) -> &str {
    if features.is_empty() {
        "default"
    } else {
        features
    }
}
