mod cli;
mod config;
mod download;
mod error;
mod model;

use clap::{CommandFactory, Parser};
use std::process::ExitCode;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tracing::{error, warn};

use crate::cli::{Cli, MissingPackId};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(cli.log_level())
        .init();

    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = interrupted.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::SeqCst);
    }) {
        warn!("could not set keyboard interrupt handler: {e}");
    }

    match cli.execute(interrupted).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is::<MissingPackId>() => {
            eprintln!("{e}");
            eprintln!("{}", Cli::command().render_usage());
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
