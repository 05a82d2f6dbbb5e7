use clap::Parser;
use trademon::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
