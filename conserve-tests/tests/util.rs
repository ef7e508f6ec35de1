use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use clap::Parser;
use conserve::{map, profile};

/// Resolves a path relative to the repository root.
pub fn repo_path(relative: impl AsRef<Path>) -> PathBuf {
    // The manifest directory of this crate is "[...]/conservation-mapper/conserve-tests".
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("test crate lives inside the repository")
        .join(relative)
}

/// Runs a `conserve` subcommand, given as its whitespace-separated arguments.
pub fn run(args: &str) -> Result<()> {
    let args = ["conserve"]
        .into_iter()
        .chain(args.split_whitespace())
        .collect::<Vec<_>>();

    match args.get(1).copied() {
        Some("map") => map::cli(map::Cli::parse_from(
            args.iter().copied().skip(1),
        )),
        Some("profile") => profile::cli(profile::Cli::parse_from(
            args.iter().copied().skip(1),
        )),
        other => Err(anyhow!("Unknown subcommand {other:?}")),
    }
}
