//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use std::error::Error;

use waypoint_cli::CliError;

fn main() {
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    match waypoint_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("waypoint: {}", describe(&err));
            std::process::exit(1);
        }
    }
}

fn describe(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut cause = err.source();
    while let Some(inner) = cause {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        cause = inner.source();
    }
    message
}
