use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::{
    color::ColorScheme,
    error::{Error, Result},
    profile::ConservationProfile,
};

/// Summary statistics of a conservation profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConservationReport {
    pub reference: String,
    pub total_residues: usize,
    pub conserved_residues: usize,
    pub variable_residues: usize,
    pub conserved_percent: f64,
    pub variable_percent: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<MappingSummary>,
    pub residues: Vec<ResidueScore>,
}

/// Where the profile was mapped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingSummary {
    pub selection: String,
    pub object: String,
    pub color_scheme: ColorScheme,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidueScore {
    pub residue_number: usize,
    pub residue: String,
    pub alignment_column: usize,
    pub score: usize,
}

impl ConservationReport {
    pub fn new(profile: &ConservationProfile) -> Result<Self> {
        if profile.is_empty() {
            return Err(Error::EmptyProfile);
        }

        let total_residues = profile.len();
        let conserved_residues = profile.conserved_count();
        let variable_residues = total_residues - conserved_residues;
        let percent = |count: usize| 100.0 * count as f64 / total_residues as f64;

        Ok(Self {
            reference: profile.reference().to_string(),
            total_residues,
            conserved_residues,
            variable_residues,
            conserved_percent: percent(conserved_residues),
            variable_percent: percent(variable_residues),
            mapping: None,
            residues: profile
                .iter()
                .map(|entry| ResidueScore {
                    residue_number: entry.residue_number,
                    residue: entry.residue.to_string(),
                    alignment_column: entry.column,
                    score: entry.score,
                })
                .collect(),
        })
    }

    pub fn with_mapping(mut self, mapping: MappingSummary) -> Self {
        self.mapping = Some(mapping);
        self
    }

    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}

impl Display for ConservationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Number of conserved residues: {} ({:.2} %)",
            self.conserved_residues, self.conserved_percent
        )?;
        write!(
            f,
            "Number of unconserved residues: {} ({:.2} %)",
            self.variable_residues, self.variable_percent
        )
    }
}
