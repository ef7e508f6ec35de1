use std::path::PathBuf;

use log::{debug, info};

use crate::{
    alignment::Alignment,
    color::{ColorScheme, NEUTRAL_COLOR},
    error::{Error, Result},
    profile::ConservationProfile,
    renderer::{Renderer, color_runs},
    report::{ConservationReport, MappingSummary},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapperConfig {
    /// Path to the alignment fasta file.
    pub alignment: PathBuf,
    /// Identifier of the alignment record that corresponds to the structure.
    pub reference: String,
    /// The structure selection to map the conservation onto.
    pub selection: String,
    pub color_scheme: ColorScheme,
}

/// Maps the conservation of an alignment onto a structure.
pub struct ConservationMapper<R> {
    config: MapperConfig,
    renderer: R,
}

impl MapperConfig {
    pub fn new(
        selection: impl Into<String>,
        reference: impl Into<String>,
        alignment: impl Into<PathBuf>,
    ) -> Self {
        Self {
            alignment: alignment.into(),
            reference: reference.into(),
            selection: selection.into(),
            color_scheme: ColorScheme::default(),
        }
    }

    pub fn with_color_scheme(mut self, color_scheme: ColorScheme) -> Self {
        self.color_scheme = color_scheme;
        self
    }

    /// The name of the object that receives the coloring.
    pub fn profile_object_name(&self) -> String {
        format!("{}_conservation_profile", self.selection)
    }
}

impl<R: Renderer> ConservationMapper<R> {
    pub fn new(config: MapperConfig, renderer: R) -> Self {
        Self { config, renderer }
    }

    pub fn load_alignment_data(&self) -> Result<Alignment> {
        Alignment::read_fasta(&self.config.alignment)
    }

    pub fn validate_reference(&self, alignment: &Alignment) -> Result<()> {
        alignment.reference(&self.config.reference).map(|_| ())
    }

    /// Ensures that the structure sequence equals the ungapped reference.
    ///
    /// Residue `i + 1` of the structure corresponds to ungapped reference position `i` only if this holds.
    pub fn compare_structure_sequences(&mut self, alignment: &Alignment) -> Result<()> {
        let reference = alignment.reference(&self.config.reference)?.ungapped();
        let structure = self.renderer.structure_sequence(&self.config.selection)?;
        debug!("Structure sequence: {structure}");

        if reference != structure {
            return Err(Error::SequenceMismatch {
                reference,
                structure,
            });
        }
        Ok(())
    }

    pub fn generate_conservation_profile(
        &self,
        alignment: &Alignment,
    ) -> Result<ConservationProfile> {
        ConservationProfile::compute(alignment, &self.config.reference)
    }

    /// Colors a fresh copy of the selection by conservation score.
    ///
    /// Objects created by earlier calls are left untouched.
    pub fn map_conserved_residues(&mut self, profile: &ConservationProfile) -> Result<()> {
        let object = self.config.profile_object_name();
        let scheme = self.config.color_scheme;

        self.renderer.clone_object(&self.config.selection, &object)?;
        self.renderer.color_object(&object, NEUTRAL_COLOR)?;

        let runs = color_runs(profile.scores().iter().map(|&score| scheme.color_for(score)));
        debug!(
            "Coloring {} residues of {object} in {} runs",
            profile.len(),
            runs.len()
        );
        for (residues, color) in runs {
            self.renderer.color_residues(&object, residues, color)?;
        }
        Ok(())
    }

    pub fn generate_statistics(&self, profile: &ConservationProfile) -> Result<ConservationReport> {
        ConservationReport::new(profile)
    }

    /// Runs all stages in order, stopping at the first failure.
    pub fn run(&mut self) -> Result<ConservationReport> {
        info!("Loading alignment");
        let alignment = self.load_alignment_data()?;

        info!("Validating reference {}", self.config.reference);
        self.validate_reference(&alignment)?;

        info!(
            "Comparing reference {} with selection {}",
            self.config.reference, self.config.selection
        );
        self.compare_structure_sequences(&alignment)?;

        info!("Computing conservation profile");
        let profile = self.generate_conservation_profile(&alignment)?;
        // Checked before mapping, so nothing is rendered for an empty profile.
        let report = self.generate_statistics(&profile)?;

        info!("Mapping conservation onto {}", self.config.selection);
        self.map_conserved_residues(&profile)?;

        Ok(report.with_mapping(MappingSummary {
            selection: self.config.selection.clone(),
            object: self.config.profile_object_name(),
            color_scheme: self.config.color_scheme,
        }))
    }
}
