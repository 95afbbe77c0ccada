mod cli;

use std::process::ExitCode;

use clap::Parser;
use log::{debug, error};
use radiooooo::display;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(cli::run(cli));
    // stdin is read on a blocking thread that may never return; don't wait for it
    runtime.shutdown_background();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("{e:?}");
            eprintln!("{}", display::error_message(&e.to_string()));
            ExitCode::FAILURE
        }
    }
}
