use std::process::ExitCode;

use clap::{Parser, Subcommand};
use conserve::{map, profile};
use log::error;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Color a structure by the conservation of an alignment and write a PyMOL script.
    Map(map::Cli),

    /// Print the conservation profile of an alignment reference.
    Profile(profile::Cli),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Map(cli) => map::cli(cli),
        Command::Profile(cli) => profile::cli(cli),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{error:#}");
            ExitCode::FAILURE
        }
    }
}
