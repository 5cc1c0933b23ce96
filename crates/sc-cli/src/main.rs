//! samconv - convert legacy T-SQL views into dbt Snowflake models

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod logging;

use cli::Cli;
use commands::convert;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    convert::execute(&cli)
}
