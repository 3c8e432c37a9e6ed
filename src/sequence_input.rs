//! Classifies raw user input as DNA or protein, once, at the boundary.

use crate::{
    error::OptimizerError, genetic_code::CODON_LENGTH, iupac_code::IupacCode, STANDARD_CODE,
};
use bio::io::fasta;
use codon_protocol::InputKind;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SequenceKind {
    /// Uppercase `ACGT`, any `U` already read as `T`.
    Dna(String),
    /// Uppercase one-letter residues, `*` for stop.
    Protein(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceInput {
    pub name: Option<String>,
    pub kind: SequenceKind,
}

impl SequenceInput {
    /// Accepts bare sequence text or a single FASTA record; further records are ignored.
    pub fn parse(raw: &str) -> Result<Self, OptimizerError> {
        let trimmed = raw.trim_start();
        let (name, body) = if trimmed.starts_with('>') {
            let record = fasta::Reader::new(trimmed.as_bytes())
                .records()
                .next()
                .ok_or(OptimizerError::EmptySequence)?
                .map_err(|e| OptimizerError::InvalidFasta(e.to_string()))?;
            let name = Some(record.id().to_string()).filter(|id| !id.is_empty());
            (name, String::from_utf8_lossy(record.seq()).to_string())
        } else {
            (None, raw.to_string())
        };
        let residues: String = body
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .collect();
        if residues.is_empty() {
            return Err(OptimizerError::EmptySequence);
        }
        Ok(Self {
            name,
            kind: Self::classify(residues)?,
        })
    }

    /// In-frame IUPAC nucleotide codes, at least half of them plain bases, eg `ATGNNNTAA`.
    /// Such input is DNA with ambiguous positions, which translation then rejects.
    fn is_ambiguous_dna(residues: &str) -> bool {
        let plain = residues.bytes().filter(|b| IupacCode::is_nucleotide(*b)).count();
        residues.len() % CODON_LENGTH == 0
            && plain * 2 >= residues.len()
            && residues
                .bytes()
                .all(|b| !IupacCode::from_letter(b).is_empty())
    }

    fn classify(residues: String) -> Result<SequenceKind, OptimizerError> {
        if residues.bytes().all(IupacCode::is_nucleotide) || Self::is_ambiguous_dna(&residues) {
            return Ok(SequenceKind::Dna(residues.replace('U', "T")));
        }
        if let Some((position, residue)) = residues
            .chars()
            .enumerate()
            .find(|(_, c)| !STANDARD_CODE.is_amino_acid(*c))
        {
            return Err(OptimizerError::UnknownAminoAcid { residue, position });
        }
        Ok(SequenceKind::Protein(residues))
    }

    pub fn input_kind(&self) -> InputKind {
        match self.kind {
            SequenceKind::Dna(_) => InputKind::Dna,
            SequenceKind::Protein(_) => InputKind::Protein,
        }
    }

    pub fn residues(&self) -> &str {
        match &self.kind {
            SequenceKind::Dna(s) | SequenceKind::Protein(s) => s,
        }
    }
}
