//! CLI argument definitions using clap derive API

use clap::Parser;
use std::path::PathBuf;

/// samconv - convert legacy T-SQL view definitions into dbt Snowflake models
#[derive(Parser, Debug)]
#[command(name = "samconv")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory containing the T-SQL view definitions
    #[arg(value_parser = existing_dir)]
    pub input_dir: PathBuf,

    /// Output directory for models and metadata
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,

    /// Config file (default: samconv.yml in the input directory, if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

fn existing_dir(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if !path.exists() {
        return Err(format!("'{value}' does not exist"));
    }
    if !path.is_dir() {
        return Err(format!("'{value}' is not a directory"));
    }
    Ok(path)
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
