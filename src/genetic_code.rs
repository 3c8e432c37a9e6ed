//! The standard genetic code (NCBI table 1) and translation helpers.

use crate::error::OptimizerError;
use std::collections::HashSet;

const BASE_ORDER: &[u8; 4] = b"TCAG";
const STANDARD_AMINO_ACIDS: &[u8; 64] =
    b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

pub const STOP: char = '*';
pub const CODON_LENGTH: usize = 3;

#[derive(Clone, Debug)]
pub struct GeneticCode {
    codons: Vec<(String, char)>,
    amino_acids: HashSet<char>,
}

impl GeneticCode {
    pub fn standard() -> Self {
        let mut codons = Vec::with_capacity(64);
        for (i, aa) in STANDARD_AMINO_ACIDS.iter().enumerate() {
            let codon: String = [
                BASE_ORDER[i / 16] as char,
                BASE_ORDER[(i / 4) % 4] as char,
                BASE_ORDER[i % 4] as char,
            ]
            .iter()
            .collect();
            codons.push((codon, *aa as char));
        }
        let amino_acids = codons.iter().map(|(_, aa)| *aa).collect();
        Self {
            codons,
            amino_acids,
        }
    }

    /// All 64 codons in TCAG order.
    pub fn codons(&self) -> &[(String, char)] {
        &self.codons
    }

    /// One of the 20 residues or `*`.
    pub fn is_amino_acid(&self, residue: char) -> bool {
        self.amino_acids.contains(&residue.to_ascii_uppercase())
    }
}

#[inline(always)]
fn base_index(base: u8) -> Option<usize> {
    match base.to_ascii_uppercase() {
        b'T' | b'U' => Some(0),
        b'C' => Some(1),
        b'A' => Some(2),
        b'G' => Some(3),
        _ => None,
    }
}

/// Translates one codon, `None` for anything that is not three plain bases.
#[inline(always)]
pub fn translate_codon(codon: &[u8]) -> Option<char> {
    if codon.len() != CODON_LENGTH {
        return None;
    }
    let index = base_index(codon[0])? * 16 + base_index(codon[1])? * 4 + base_index(codon[2])?;
    Some(STANDARD_AMINO_ACIDS[index] as char)
}

pub fn check_codon_length(sequence: &str) -> Result<(), OptimizerError> {
    if sequence.is_empty() {
        return Err(OptimizerError::EmptySequence);
    }
    if sequence.len() % CODON_LENGTH != 0 {
        return Err(OptimizerError::InvalidLength {
            length: sequence.len(),
        });
    }
    Ok(())
}

/// Splits a sequence into uppercase codons; a trailing partial codon is dropped.
///
/// Works on bytes, so a non-ASCII letter ends up in a codon that translates to nothing.
pub fn split_codons(sequence: &str) -> Vec<String> {
    sequence
        .as_bytes()
        .chunks_exact(CODON_LENGTH)
        .map(|codon| String::from_utf8_lossy(codon).to_ascii_uppercase())
        .collect()
}

pub fn translate(sequence: &str) -> Result<String, OptimizerError> {
    check_codon_length(sequence)?;
    sequence
        .as_bytes()
        .chunks(CODON_LENGTH)
        .enumerate()
        .map(|(position, codon)| {
            translate_codon(codon).ok_or_else(|| OptimizerError::UnknownCodon {
                codon: String::from_utf8_lossy(codon).to_uppercase(),
                position,
            })
        })
        .collect()
}

/// Fails unless `sequence` translates to exactly `protein`.
pub fn check_translation(sequence: &str, protein: &str) -> Result<(), OptimizerError> {
    let translated = translate(sequence)?;
    if translated != protein {
        return Err(OptimizerError::ProteinChanged {
            expected: protein.to_string(),
            found: translated,
        });
    }
    Ok(())
}
