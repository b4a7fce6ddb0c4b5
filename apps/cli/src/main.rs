#![allow(clippy::print_stdout)]

pub mod args;
pub mod run;

use crate::args::Cli;
use clap::Parser;
use mgen_logger::Logger;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let builder = Logger::builder()
        .name(env!("CARGO_BIN_NAME"))
        .level(cli.log_level)
        .json(cli.log_json)
        .ansi(false);
    let _logger = match &cli.log_dir {
        Some(dir) => builder.path(dir).init()?,
        None => builder.init()?,
    };

    let document = run::run(&cli)?;
    println!("{document}");
    Ok(())
}
