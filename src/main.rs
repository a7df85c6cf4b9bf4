use std::process::ExitCode;
use clap::Parser as ClapParser;
use monkey_interpreter::{Config, RunError};

fn main() -> ExitCode {
    let config: Config = Config::parse();
    monkey_interpreter::util::init_tracing(config.verbose);

    let result = monkey_interpreter::run_on_large_stack(move || monkey_interpreter::run(config))
        .map_err(RunError::from)
        .and_then(|result| result);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        // Parse and runtime errors have already been printed where they happened
        Err(RunError::Io(err)) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        },
        Err(err) => {
            tracing::debug!(%err, "run failed");
            ExitCode::FAILURE
        },
    }
}
