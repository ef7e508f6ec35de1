use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow, bail, ensure};
use itertools::Itertools;
use lib_conserve::alignment::{fasta::parse_fasta, ungapped};
use log::{debug, info, warn};
use pdbtbx::{Chain, ReadOptions, Residue, StrictnessLevel};

/// Where the sequence of the structure selection comes from.
#[derive(Debug, Clone)]
pub enum StructureSource {
    Pdb { path: PathBuf, chain: Option<char> },
    Fasta { path: PathBuf },
}

impl StructureSource {
    /// The ungapped one-letter sequence of the structure.
    pub fn sequence(&self) -> Result<String> {
        let sequence = match self {
            Self::Pdb { path, chain } => {
                info!("Extracting structure sequence from PDB file {path:?}");
                pdb_sequence(path, *chain)
                    .with_context(|| format!("Unable to read structure file {path:?}"))?
            }
            Self::Fasta { path } => {
                info!("Reading structure sequence from fasta file {path:?}");
                fasta_sequence(path)?
            }
        };

        ensure!(!sequence.is_empty(), "The structure contains no residues");
        debug!("Structure has {} residues", sequence.chars().count());
        Ok(sequence)
    }
}

fn fasta_sequence(path: &Path) -> Result<String> {
    let file =
        File::open(path).with_context(|| format!("Unable to open structure file {path:?}"))?;
    let mut records = parse_fasta(BufReader::new(file), &path.to_string_lossy())?;
    if records.len() != 1 {
        bail!(
            "Expected single-record fasta file, but found {} records",
            records.len()
        );
    }
    Ok(ungapped(&records.remove(0).sequence))
}

/// Extracts the residue sequence of the first model of a PDB or mmCIF file.
///
/// Waters and hetero groups without a backbone are skipped.
/// Amino acids with an unknown residue name are written as `X`.
pub fn pdb_sequence(path: &Path, chain: Option<char>) -> Result<String> {
    let (pdb, warnings) = ReadOptions::default()
        .set_level(StrictnessLevel::Loose)
        .read(path.to_string_lossy())
        .map_err(|errors| anyhow!("{}", errors.iter().join("\n")))?;
    for warning in &warnings {
        debug!("{warning}");
    }

    let model = pdb
        .models()
        .next()
        .ok_or_else(|| anyhow!("The structure contains no models"))?;
    if pdb.model_count() > 1 {
        info!(
            "Using the first of {} models in the structure",
            pdb.model_count()
        );
    }

    let mut unknown = Vec::new();
    let sequence = model
        .chains()
        .filter(|candidate| chain.is_none_or(|id| chain_has_id(candidate, id)))
        .flat_map(|candidate| candidate.residues())
        .filter_map(|residue| {
            let code = residue_code(residue)?;
            if code == 'X' {
                unknown.extend(residue.name().map(str::to_string));
            }
            Some(code)
        })
        .collect::<String>();

    if !unknown.is_empty() {
        warn!(
            "{} residues have an unknown residue name and were translated to 'X': {}",
            unknown.len(),
            unknown.iter().unique().join(", ")
        );
    }
    Ok(sequence)
}

fn chain_has_id(chain: &Chain, id: char) -> bool {
    let mut chars = chain.id().chars();
    chars.next() == Some(id) && chars.next().is_none()
}

/// The one-letter code of a polymer residue, or `None` if the residue is not part of the sequence.
fn residue_code(residue: &Residue) -> Option<char> {
    let name = residue.name()?;
    if matches!(name, "HOH" | "WAT" | "DOD") {
        return None;
    }
    if let Some(code) = one_letter_code(name) {
        return Some(code);
    }

    let is_polymer = residue.atoms().all(|atom| !atom.hetero())
        || residue.atoms().any(|atom| atom.name() == "CA");
    is_polymer.then_some('X')
}

fn one_letter_code(residue_name: &str) -> Option<char> {
    Some(match residue_name {
        "ALA" => 'A',
        "ARG" => 'R',
        "ASN" => 'N',
        "ASP" => 'D',
        "CYS" => 'C',
        "GLN" => 'Q',
        "GLU" => 'E',
        "GLY" => 'G',
        "HIS" => 'H',
        "ILE" => 'I',
        "LEU" => 'L',
        "LYS" => 'K',
        "MET" => 'M',
        "PHE" => 'F',
        "PRO" => 'P',
        "SER" => 'S',
        "THR" => 'T',
        "TRP" => 'W',
        "TYR" => 'Y',
        "VAL" => 'V',
        "SEC" => 'U',
        "PYL" => 'O',
        // Modified residues, by their parent amino acid.
        "MSE" | "FME" => 'M',
        "SEP" => 'S',
        "TPO" => 'T',
        "PTR" => 'Y',
        "HYP" => 'P',
        "CSO" | "CSD" | "CME" | "OCS" | "SCY" => 'C',
        "MLY" | "M3L" | "KCX" | "ALY" | "LLP" => 'K',
        "CGU" | "PCA" => 'E',
        "MEN" => 'N',
        _ => return None,
    })
}
