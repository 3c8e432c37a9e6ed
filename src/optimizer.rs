//! Best-codon substitution and reverse translation.

use crate::{
    adaptiveness::RelativeAdaptiveness,
    error::OptimizerError,
    genetic_code::{split_codons, translate},
    sequence_input::{SequenceInput, SequenceKind},
};
use codon_protocol::CodonChange;
use tracing::debug;

#[derive(Clone, Debug, PartialEq)]
pub struct BaseOptimization {
    pub protein: String,
    /// Input DNA, `None` for protein input.
    pub original: Option<String>,
    pub optimized: String,
    pub codon_changes: Vec<CodonChange>,
}

/// Emits the highest-w_i codon for every residue of `protein`.
pub fn reverse_translate(
    protein: &str,
    weights: &RelativeAdaptiveness,
) -> Result<String, OptimizerError> {
    protein
        .chars()
        .enumerate()
        .map(|(position, residue)| {
            weights
                .best_codon(residue)
                .ok_or(OptimizerError::UnknownAminoAcid { residue, position })
        })
        .collect()
}

pub fn optimize(
    input: &SequenceInput,
    weights: &RelativeAdaptiveness,
) -> Result<BaseOptimization, OptimizerError> {
    match &input.kind {
        SequenceKind::Dna(dna) => {
            let protein = translate(dna)?;
            let optimized = reverse_translate(&protein, weights)?;
            let codon_changes = codon_changes(dna, &optimized, &protein);
            debug!(
                codons = protein.len(),
                changed = codon_changes.len(),
                "optimized DNA input"
            );
            Ok(BaseOptimization {
                protein,
                original: Some(dna.clone()),
                optimized,
                codon_changes,
            })
        }
        SequenceKind::Protein(protein) => {
            let optimized = reverse_translate(protein, weights)?;
            debug!(residues = protein.len(), "reverse-translated protein input");
            Ok(BaseOptimization {
                protein: protein.clone(),
                original: None,
                optimized,
                codon_changes: vec![],
            })
        }
    }
}

/// Lists every codon that differs between two in-frame sequences of one protein.
pub fn codon_changes(original: &str, optimized: &str, protein: &str) -> Vec<CodonChange> {
    split_codons(original)
        .into_iter()
        .zip(split_codons(optimized))
        .zip(protein.chars())
        .enumerate()
        .filter(|(_, ((before, after), _))| before != after)
        .map(|(i, ((before, after), amino_acid))| CodonChange {
            position: i + 1,
            original: before,
            optimized: after,
            amino_acid,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codon_usage::{CodonUsageCatalog, DEFAULT_ORGANISM};

    fn ecoli() -> RelativeAdaptiveness {
        let catalog = CodonUsageCatalog::default();
        RelativeAdaptiveness::from_table(catalog.get(DEFAULT_ORGANISM).unwrap())
    }

    #[test]
    fn test_dna_input() {
        let input = SequenceInput::parse("ATGCTACTGAAGTAG").unwrap();
        let result = optimize(&input, &ecoli()).unwrap();
        assert_eq!(result.protein, "MLLK*");
        assert_eq!(result.optimized, "ATGCTGCTGAAATAA");
        assert_eq!(result.original.as_deref(), Some("ATGCTACTGAAGTAG"));
        assert_eq!(
            result.codon_changes,
            vec![
                CodonChange {
                    position: 2,
                    original: "CTA".to_string(),
                    optimized: "CTG".to_string(),
                    amino_acid: 'L'
                },
                CodonChange {
                    position: 4,
                    original: "AAG".to_string(),
                    optimized: "AAA".to_string(),
                    amino_acid: 'K'
                },
                CodonChange {
                    position: 5,
                    original: "TAG".to_string(),
                    optimized: "TAA".to_string(),
                    amino_acid: '*'
                },
            ]
        );
    }

    #[test]
    fn test_protein_input() {
        let input = SequenceInput::parse("MKRG*").unwrap();
        let result = optimize(&input, &ecoli()).unwrap();
        assert_eq!(result.original, None);
        assert_eq!(result.optimized, "ATGAAACGCGGCTAA");
        assert!(result.codon_changes.is_empty());
        assert_eq!(translate(&result.optimized).unwrap(), "MKRG*");
    }

    #[test]
    fn test_invalid_dna_length() {
        let input = SequenceInput::parse("ATGCA").unwrap();
        assert_eq!(
            optimize(&input, &ecoli()),
            Err(OptimizerError::InvalidLength { length: 5 })
        );
    }

    #[test]
    fn test_idempotent() {
        let w = ecoli();
        let input = SequenceInput::parse("MSTNQLVHWDEACYFIPRG*").unwrap();
        let first = optimize(&input, &w).unwrap();
        let again = optimize(&SequenceInput::parse(&first.optimized).unwrap(), &w).unwrap();
        assert_eq!(again.optimized, first.optimized);
        assert!(again.codon_changes.is_empty());
        assert_eq!(again.protein, "MSTNQLVHWDEACYFIPRG*");
    }
}
