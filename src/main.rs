mod atomic_write;
mod config;
mod convert;
mod file_matching;
mod serde_glob;

use anyhow::Result;
use clap::Parser;
use config::{PartialConfig, load_config};
use convert::convert;
use env_logger::{Builder, Env};
use glob::Pattern;
use log::debug;
use std::{
    io::{self, Write as _},
    path::PathBuf,
};

#[derive(Parser)]
#[command(
    name = "tabs2spaces",
    version,
    about = "Replace tabs with spaces in files, in place"
)]
struct Cli {
    /// Files or directories to convert. Directories are searched recursively
    /// for files whose names match the pattern; files are always converted.
    #[arg(default_value = "src")]
    targets: Vec<PathBuf>,

    /// Number of spaces to replace each tab with [default: 4].
    #[arg(short, long)]
    spaces: Option<usize>,

    /// Glob matched against file names in directories [default: *.java].
    #[arg(short, long)]
    pattern: Option<Pattern>,

    /// JSON5 config file with `pattern` and `spaces` keys. No config file is
    /// read unless this is given.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    quiet: bool,

    /// Print a sample config file.
    #[arg(long)]
    sample_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "warn" } else { "info" };
    let env = Env::new()
        .filter_or("TABS2SPACES_LOG", default_level)
        .write_style("TABS2SPACES_LOG_STYLE");
    Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .init();

    if cli.sample_config {
        print!("{}", include_str!("../sample_config.json5"));
        return Ok(());
    }

    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let overrides = PartialConfig {
        pattern: cli.pattern,
        spaces: cli.spaces,
    };
    let config = load_config(cli.config.as_deref(), overrides)?;
    debug!(
        "Replacing tabs with {} spaces in files matching '{}'",
        config.spaces, config.pattern
    );

    let mut stdout = io::stdout().lock();

    // Targets are independent but the first error stops everything.
    for target in &cli.targets {
        convert(target, &config, &mut stdout)?;
    }

    stdout.flush()?;
    Ok(())
}
