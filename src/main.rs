use std::process::ExitCode;

use clap::Parser;
use quadrotate::cli::{self, CliArgs};
use quadrotate::logger;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Session log (overwrites the previous run's log)
    match &args.log_file {
        Some(path) => logger::init_at(path),
        None => logger::init(),
    }
    logger::set_echo(args.verbose);

    cli::run(args)
}
