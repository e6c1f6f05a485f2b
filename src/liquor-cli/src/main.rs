mod cli;
mod commands;

use std::process;

use crate::cli::{parse_args, Cli};
use crate::commands::{execute, load_config};

fn main() {
    let cli = parse_args();
    setup_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli)?;
    config.apply_global();
    println!("{}", execute(cli, &config)?);
    Ok(())
}

fn setup_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    // RUST_LOG, when set, overrides -v
    env_logger::Builder::new()
        .filter_level(log_level)
        .parse_default_env()
        .init();
}
