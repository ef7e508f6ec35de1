use std::fmt::{self, Display};

use crate::{color::Color, error::Result};

/// The structure visualisation host.
///
/// The mapper issues its commands strictly in order and never concurrently.
pub trait Renderer {
    /// Returns the ungapped one-letter sequence of the residues in `selection`.
    fn structure_sequence(&mut self, selection: &str) -> Result<String>;

    /// Copies `selection` into a new object called `new_name`.
    fn clone_object(&mut self, selection: &str, new_name: &str) -> Result<()>;

    /// Colors the whole object.
    fn color_object(&mut self, name: &str, color: Color) -> Result<()>;

    /// Colors a range of residues of an object.
    fn color_residues(&mut self, name: &str, residues: ResidueSpec, color: Color) -> Result<()>;
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn structure_sequence(&mut self, selection: &str) -> Result<String> {
        (**self).structure_sequence(selection)
    }

    fn clone_object(&mut self, selection: &str, new_name: &str) -> Result<()> {
        (**self).clone_object(selection, new_name)
    }

    fn color_object(&mut self, name: &str, color: Color) -> Result<()> {
        (**self).color_object(name, color)
    }

    fn color_residues(&mut self, name: &str, residues: ResidueSpec, color: Color) -> Result<()> {
        (**self).color_residues(name, residues, color)
    }
}

/// An inclusive range of 1-based residue numbers.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ResidueSpec {
    pub first: usize,
    pub last: usize,
}

impl ResidueSpec {
    pub fn single(residue_number: usize) -> Self {
        Self {
            first: residue_number,
            last: residue_number,
        }
    }

    /// PyMOL selection of these residues within `object`.
    pub fn selection(&self, object: &str) -> String {
        format!("resi {self} and {object}")
    }
}

impl Display for ResidueSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.first == self.last {
            write!(f, "{}", self.first)
        } else {
            write!(f, "{}-{}", self.first, self.last)
        }
    }
}

/// Groups consecutive residues with equal colors.
///
/// Residue `i + 1` gets `colors[i]`.
pub fn color_runs(colors: impl IntoIterator<Item = Color>) -> Vec<(ResidueSpec, Color)> {
    let mut runs: Vec<(ResidueSpec, Color)> = Vec::new();
    for (index, color) in colors.into_iter().enumerate() {
        let residue_number = index + 1;
        match runs.last_mut() {
            Some((spec, last_color)) if *last_color == color && spec.last + 1 == residue_number => {
                spec.last = residue_number
            }
            _ => runs.push((ResidueSpec::single(residue_number), color)),
        }
    }
    runs
}
