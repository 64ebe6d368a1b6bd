use clap::Parser;
use stockgate::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
