use std::collections::BTreeSet;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::{
    alignment::{Alignment, is_gap},
    error::Result,
};

/// Column indices of all non-gap characters of an aligned reference sequence, in ascending order.
pub fn reference_positions(aligned_reference: &str) -> Vec<usize> {
    aligned_reference
        .chars()
        .enumerate()
        .filter(|(_, c)| !is_gap(*c))
        .map(|(column, _)| column)
        .collect()
}

/// The number of distinct residues per ungapped reference position.
///
/// A score of 1 means that the position is fully conserved.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ConservationProfile {
    reference: String,
    /// The ungapped reference residue at each position.
    residues: Vec<char>,
    /// The alignment column of each position.
    columns: Vec<usize>,
    scores: Vec<usize>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ProfileEntry {
    /// 1-based residue number in the ungapped reference.
    pub residue_number: usize,
    pub residue: char,
    pub column: usize,
    pub score: usize,
}

impl ConservationProfile {
    pub fn compute(alignment: &Alignment, reference: &str) -> Result<Self> {
        let reference_record = alignment.reference(reference)?;
        let columns = reference_positions(&reference_record.sequence);
        debug!(
            "Reference {reference} occupies {} of {} alignment columns",
            columns.len(),
            alignment.width()
        );

        // Project every sequence onto the reference columns.
        let cleaned: Vec<Vec<char>> = alignment
            .records()
            .iter()
            .map(|record| {
                let sequence: Vec<char> = record.sequence.chars().collect();
                columns.iter().map(|&column| sequence[column]).collect()
            })
            .collect();

        let scores = (0..columns.len())
            .map(|position| {
                let residues: BTreeSet<char> = cleaned
                    .iter()
                    .map(|sequence| sequence[position])
                    .filter(|&c| !is_gap(c))
                    .collect();
                trace!("Position {position}: {residues:?}");
                residues.len()
            })
            .collect();

        Ok(Self {
            reference: reference.to_string(),
            residues: reference_record
                .sequence
                .chars()
                .filter(|&c| !is_gap(c))
                .collect(),
            columns,
            scores,
        })
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn scores(&self) -> &[usize] {
        &self.scores
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// The number of positions with exactly one distinct residue.
    pub fn conserved_count(&self) -> usize {
        self.scores.iter().filter(|&&score| score == 1).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = ProfileEntry> + '_ {
        self.scores
            .iter()
            .zip(&self.residues)
            .zip(&self.columns)
            .enumerate()
            .map(|(index, ((&score, &residue), &column))| ProfileEntry {
                residue_number: index + 1,
                residue,
                column,
                score,
            })
    }
}
