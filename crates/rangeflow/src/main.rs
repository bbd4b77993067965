use std::process::ExitCode;

use clap::Parser;

use crate::cli::app::{App, Commands};

mod cli;
mod logging;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let app = App::parse();
    logging::init(app.log_level)?;

    match app.cmd {
        Commands::Fetch(arg) => cli::fetch::run(arg).await,
    }
}
