use std::{
    fs::{self, File},
    io::{BufWriter, Write, stdout},
    path::PathBuf,
};

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser};
use lib_conserve::{
    color::ColorScheme,
    mapper::{ConservationMapper, MapperConfig},
    report::ConservationReport,
};
use log::{LevelFilter, info};

use crate::{
    init_logging,
    map::{pml_renderer::PmlScriptRenderer, structure::StructureSource},
};

pub mod pml_renderer;
pub mod structure;

#[derive(Parser)]
pub struct Cli {
    #[clap(long, short = 'l', default_value = "info")]
    log_level: LevelFilter,

    /// Name of the structure object or selection to color.
    ///
    /// The colored copy is called `<SELECTION>_conservation_profile`.
    selection: String,

    /// Identifier of the alignment sequence that corresponds to the structure.
    reference: String,

    /// The alignment in fasta format.
    ///
    /// Gaps are `-`, and `*` is treated like a gap.
    alignment: PathBuf,

    #[command(flatten)]
    structure: CliStructure,

    /// Only take residues from this chain of the PDB file.
    #[clap(long, requires = "structure")]
    chain: Option<char>,

    /// Start the script by loading the PDB file into an object named like the selection.
    #[clap(long, requires = "structure")]
    load: bool,

    /// The PyMOL script (`.pml`) to write the coloring commands to.
    #[clap(long, short = 's')]
    script: PathBuf,

    #[clap(long, short = 'c', default_value = "reds")]
    color_scheme: ColorScheme,

    /// The file to store the conservation report in toml format.
    #[clap(long, short = 'o')]
    output: Option<PathBuf>,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct CliStructure {
    /// A PDB file of the structure.
    #[clap(long, short = 'p')]
    structure: Option<PathBuf>,

    /// A single-record fasta file with the sequence of the structure selection.
    #[clap(long)]
    structure_fasta: Option<PathBuf>,
}

pub fn cli(cli: Cli) -> Result<()> {
    init_logging(cli.log_level);

    let source = if let Some(path) = &cli.structure.structure {
        StructureSource::Pdb {
            path: path.clone(),
            chain: cli.chain,
        }
    } else if let Some(path) = &cli.structure.structure_fasta {
        StructureSource::Fasta { path: path.clone() }
    } else {
        return Err(anyhow!("No structure input given"));
    };
    let structure_sequence = source.sequence()?;

    let mut renderer = PmlScriptRenderer::new(Vec::new(), structure_sequence);
    if cli.load {
        if let StructureSource::Pdb { path, .. } = &source {
            renderer.load_structure(path, &cli.selection)?;
        }
    }

    let config = MapperConfig::new(&cli.selection, &cli.reference, &cli.alignment)
        .with_color_scheme(cli.color_scheme);
    let report = ConservationMapper::new(config, &mut renderer).run()?;

    info!("Writing PyMOL script to {:?}", cli.script);
    let script = renderer.finish()?;
    fs::write(&cli.script, script)
        .with_context(|| format!("Unable to write script file {:?}", cli.script))?;

    write_statistics(&report, stdout().lock())?;

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

/// Writes the conservation statistics and the name of the colored object.
pub fn write_statistics(
    report: &ConservationReport,
    mut output: impl Write,
) -> std::io::Result<()> {
    writeln!(output, "{report}")?;
    if let Some(mapping) = &report.mapping {
        writeln!(
            output,
            "Colored {} by conservation ({})",
            mapping.object, mapping.color_scheme
        )?;
    }
    Ok(())
}
