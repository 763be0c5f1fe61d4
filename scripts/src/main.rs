use std::{path::Path, process::ExitCode};

use clap::Parser;
use sentinel_scripts::{cli::Cli, config::load_env_file};

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = load_env_file(Path::new(".env")) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }
    let Cli { command } = Cli::parse();

    tracing_subscriber::fmt().pretty().init();

    match command.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
