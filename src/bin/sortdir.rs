use std::fs;
use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;

use sortdir::sorter::{Config, Sorter};

#[derive(Parser)]
#[command(
    author,
    version,
    name = env!("CARGO_BIN_NAME"),
    about = "Sort files into category folders with transliterated names"
)]
struct Args {
    /// Optional input directory to sort
    #[arg(value_hint = clap::ValueHint::DirPath)]
    path: Option<PathBuf>,

    /// Only print changes without moving files
    #[arg(short, long)]
    print: bool,

    /// Print verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Config from the `[sortdir]` section of the user config file.
#[derive(Debug, Default, Deserialize)]
struct SortConfig {
    #[serde(default)]
    dryrun: bool,
    #[serde(default)]
    verbose: bool,
}

/// Wrapper needed for parsing the config file section.
#[derive(Debug, Default, Deserialize)]
struct UserConfig {
    #[serde(default)]
    sortdir: SortConfig,
}

impl UserConfig {
    /// Try to read user config from file if it exists.
    /// Otherwise, fall back to default config.
    fn get_user_config() -> SortConfig {
        sortdir::config::CONFIG_PATH
            .as_deref()
            .and_then(|path| fs::read_to_string(path).ok())
            .and_then(|config_string| toml::from_str::<UserConfig>(&config_string).ok())
            .unwrap_or_default()
            .sortdir
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let root = sortdir::resolve_input_path(args.path.as_deref())?;
    if !root.is_dir() {
        anyhow::bail!("Input path is not a directory: '{}'", root.display());
    }
    let user_config = UserConfig::get_user_config();
    let config = Config {
        dryrun: args.print || user_config.dryrun,
        verbose: args.verbose || user_config.verbose,
    };
    Sorter::new(root, config).sort()
}
