// this_file: crates/pixfont-cli/src/main.rs

//! pixfont CLI: inspect fonts and render a line of text to an image

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Render(args) => commands::render::run(args),
    }
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env().filter_level(level).init();
}
