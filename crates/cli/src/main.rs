use std::process::ExitCode;

use clap::Parser;

mod cli;
mod commands;
mod config;
mod error;
mod prompt;
mod render;

use cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let Cli { config: args, command } = Cli::parse();

    let settings = match config::load(&args) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(err.exit_code());
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "pftracker={level},pftracker_client={level}",
            level = settings.log_level
        ))
        .with_writer(std::io::stderr)
        .init();

    match commands::run(command, &settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(?err, "command failed");
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
