// src/main.rs

use clap::Parser;

use calcdag::cli::CliArgs;
use calcdag::logging::init_logging;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_level)?;

    calcdag::run(args)?;
    Ok(())
}
