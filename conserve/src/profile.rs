use std::{
    fs::File,
    io::{BufWriter, Write, stdout},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use lib_conserve::{alignment::Alignment, profile::ConservationProfile, report::ConservationReport};
use log::{LevelFilter, info};

use crate::init_logging;

#[derive(Parser)]
pub struct Cli {
    #[clap(long, short = 'l', default_value = "info")]
    log_level: LevelFilter,

    /// Identifier of the alignment sequence to compute the profile for.
    reference: String,

    /// The alignment in fasta format.
    alignment: PathBuf,

    /// The file to store the conservation report in toml format.
    #[clap(long, short = 'o')]
    output: Option<PathBuf>,
}

pub fn cli(cli: Cli) -> Result<()> {
    init_logging(cli.log_level);

    let alignment = Alignment::read_fasta(&cli.alignment)?;
    info!("Computing conservation profile of {}", cli.reference);
    let profile = ConservationProfile::compute(&alignment, &cli.reference)?;
    let report = ConservationReport::new(&profile)?;

    let mut out = BufWriter::new(stdout().lock());
    write_profile(&profile, &report, &mut out)?;
    out.flush()?;

    if let Some(output) = &cli.output {
        info!("Writing conservation report to {output:?}");
        let mut output_file = BufWriter::new(
            File::create(output)
                .with_context(|| format!("Unable to create output file {output:?}"))?,
        );
        write!(output_file, "{}", report.to_toml()?)?;
        output_file.flush()?;
    }

    Ok(())
}

/// Writes a header, one tab-separated line per reference residue and the statistics.
pub fn write_profile(
    profile: &ConservationProfile,
    report: &ConservationReport,
    mut output: impl Write,
) -> std::io::Result<()> {
    writeln!(output, "residue_number\tresidue\tscore")?;
    for entry in profile.iter() {
        writeln!(
            output,
            "{}\t{}\t{}",
            entry.residue_number, entry.residue, entry.score
        )?;
    }
    writeln!(output, "{report}")
}
