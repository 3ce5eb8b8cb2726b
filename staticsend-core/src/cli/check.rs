use crate::conf::{SendOptions, load_options};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Resolved view of an options file, as printed by `check --json`.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct OptionsSummary {
    pub root: PathBuf,
    pub index: Option<String>,
    pub max_age_ms: u64,
    pub immutable: bool,
    pub hidden: bool,
    pub format: bool,
    pub extensions: Vec<String>,
    pub precompressed: Vec<&'static str>,
}

impl OptionsSummary {
    pub fn new(options: &SendOptions, root: PathBuf) -> Self {
        let mut precompressed = Vec::new();
        if options.brotli {
            precompressed.push("br");
        }
        if options.gzip {
            precompressed.push("gzip");
        }

        Self {
            root,
            index: options.index.clone(),
            max_age_ms: u64::try_from(options.max_age.as_millis()).unwrap_or(u64::MAX),
            immutable: options.immutable,
            hidden: options.hidden,
            format: options.format,
            extensions: options.fallback_extensions(),
            precompressed,
        }
    }
}

/// Loads and validates an options file, then prints what it resolves to.
pub fn check(config: &Path, json: bool) -> anyhow::Result<()> {
    let options = load_options(config)?;
    let summary = OptionsSummary::new(&options, options.root_dir()?);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{} options loaded from {}", "✔".green(), config.display());
    println!("{} root {}", "✔".green(), summary.root.display());

    if !summary.root.is_dir() {
        println!(
            "{} root is not a directory; every request will fail",
            "!".yellow().bold()
        );
    }

    match &summary.index {
        Some(index) => println!("{} index {index}", "✔".green()),
        None => println!("{} no index", "✔".green()),
    }

    if !summary.extensions.is_empty() {
        println!(
            "{} extension fallback {}",
            "✔".green(),
            summary.extensions.join(", ")
        );
    }

    if !summary.precompressed.is_empty() {
        println!(
            "{} precompressed variants {}",
            "✔".green(),
            summary.precompressed.join(", ")
        );
    }

    Ok(())
}
