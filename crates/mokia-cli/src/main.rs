//! mokia - live-reloading mock HTTP server.
//!
//! Parses arguments, sets up logging and colors, then hands over to the
//! `run` command.

use clap::Parser;
use miette::Result;
use mokia_cli::{cli, commands, error, logger, ui};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.debug, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let result = commands::execute(args).await;

    result.map_err(error::cli_error_to_miette)
}
