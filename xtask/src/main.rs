// Desktop/tooling crate — unwrap/expect/panic acceptable in non-embedded code.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod cargo;
mod check;
mod headers;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "opus-shim development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Regenerate include/*.h from the Rust constants
    Headers {
        /// Fail instead of writing when a header is out of date
        #[arg(long)]
        check: bool,
    },
    /// Check the shim for host and bare-metal targets across the feature matrix
    Check,
    /// Run the test suite across the feature matrix
    Test {
        /// Run only the mono (default feature) configuration
        #[arg(long)]
        quick: bool,
        /// Also run the tests against libopus in OPUS_LIB_DIR
        #[arg(long)]
        link: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Headers { check } => headers::run(check),
        Commands::Check => check::run(),
        Commands::Test { quick, link } => test::run(quick, link),
    }
}
