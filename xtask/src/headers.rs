//! Render `include/*.h` from the Rust constants.
//!
//! The C headers are what a libopus build (`-DCUSTOM_SUPPORT`) and a
//! binding generator see; the Rust constants are the source of truth.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

use opus_shim::alloc::HOOK_SYMBOLS;
use opus_shim::config::PINNED_LIBOPUS_VERSION;
use opus_shim::{OPUS_DECODER_ALIGN, OPUS_DECODER_SIZE_CH1, OPUS_DECODER_SIZE_CH2};

const DECODER_TEMPLATE: &str = include_str!("../templates/decoder.h.in");
const CUSTOM_SUPPORT_TEMPLATE: &str = include_str!("../templates/custom_support.h.in");

/// One generated header.
pub struct Header {
    pub file_name: &'static str,
    pub contents: String,
}

pub fn render_decoder() -> String {
    DECODER_TEMPLATE
        .replace("{{VERSION}}", PINNED_LIBOPUS_VERSION)
        .replace("{{SIZE_CH1}}", &OPUS_DECODER_SIZE_CH1.to_string())
        .replace("{{SIZE_CH2}}", &OPUS_DECODER_SIZE_CH2.to_string())
        .replace("{{ALIGN}}", &OPUS_DECODER_ALIGN.to_string())
}

pub fn render_custom_support() -> String {
    let [alloc, realloc, free] = HOOK_SYMBOLS;
    CUSTOM_SUPPORT_TEMPLATE
        .replace("{{ALLOC}}", alloc)
        .replace("{{REALLOC}}", realloc)
        .replace("{{FREE}}", free)
}

pub fn render_all() -> Vec<Header> {
    vec![
        Header {
            file_name: "decoder.h",
            contents: render_decoder(),
        },
        Header {
            file_name: "custom_support.h",
            contents: render_custom_support(),
        },
    ]
}

/// Workspace `include/` directory.
pub fn include_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("include")
}

/// Bring `dir` up to date, or with `check` only report what is stale.
///
/// Returns the names of headers whose contents differed from the rendering.
pub fn sync(dir: &Path, check: bool) -> Result<Vec<&'static str>> {
    let mut stale = Vec::new();
    for header in render_all() {
        let path = dir.join(header.file_name);
        let current = std::fs::read_to_string(&path).unwrap_or_default();
        if current == header.contents {
            continue;
        }
        stale.push(header.file_name);
        if !check {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            std::fs::write(&path, &header.contents)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
    }
    Ok(stale)
}

pub fn run(check: bool) -> Result<()> {
    println!();
    println!("{}", "📄 Syncing C headers...".cyan().bold());
    println!();

    let dir = include_dir();
    let stale = sync(&dir, check)?;

    if stale.is_empty() {
        println!("{}", "  ✓ Headers are up to date".green());
    } else if check {
        for name in &stale {
            eprintln!("{}", format!("  ✗ include/{name} is out of date").red().bold());
        }
        eprintln!("     Run 'cargo xtask headers' to regenerate");
        anyhow::bail!("{} header(s) out of date", stale.len());
    } else {
        for name in &stale {
            println!("{}", format!("  ✓ Wrote include/{name}").green());
        }
    }
    println!();

    Ok(())
}
