use anyhow::Result;
use colored::Colorize;
use std::time::Instant;

use crate::cargo::{step, workspace_step, CLIPPY_ARGS, FEATURE_SETS, FMT_ARGS};

/// Bare-metal targets the shim must build for.
///
/// thumbv6m (Cortex-M0/M0+) is the smallest core libopus runs on without
/// assembly; thumbv7em covers the Cortex-M4/M7 parts.
const EMBEDDED_TARGETS: &[&str] = &["thumbv6m-none-eabi", "thumbv7em-none-eabihf"];

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 Checking opus-shim builds...".cyan().bold());
    println!();

    let total_start = Instant::now();

    // Check 1: Host target, every feature combination plus tracing
    for features in FEATURE_SETS {
        step("Checking host target", &["check"], features)?;
    }
    step("Checking host target", &["check"], "stereo,custom-support,tracing,link")?;
    println!();

    // Check 2: Bare-metal targets, with defmt where a logger exists
    for target in EMBEDDED_TARGETS {
        for features in FEATURE_SETS {
            step(
                &format!("Checking {target}"),
                &["check", "--target", target],
                features,
            )?;
        }
        step(
            &format!("Checking {target}"),
            &["check", "--target", target],
            "stereo,custom-support,defmt",
        )?;
        println!();
    }

    // Check 3: Headers in sync with the Rust constants
    crate::headers::run(true)?;

    // Check 4: Clippy and formatting
    workspace_step("Running clippy (warnings denied)", CLIPPY_ARGS)?;
    if let Err(err) = workspace_step("Checking formatting", FMT_ARGS) {
        eprintln!("     Run 'cargo fmt --all' to fix");
        return Err(err);
    }
    println!();

    println!(
        "{}",
        format!(
            "✓ All checks completed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}
