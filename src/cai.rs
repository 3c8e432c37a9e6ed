//! Codon Adaptation Index and per-sequence codon statistics.

use crate::{
    adaptiveness::RelativeAdaptiveness,
    error::OptimizerError,
    gc_contents::gc_fraction,
    genetic_code::{check_codon_length, split_codons},
};
use serde::Serialize;

const MIN_SCORED_CODONS: usize = 2;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CaiScore {
    pub cai: f64,
    pub codon_count: usize,
    /// w_i for every codon, start and stop included.
    pub wi_values: Vec<f64>,
    pub codons: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SequenceStats {
    pub total_codons: usize,
    pub gc_content: f64,
    pub mean_wi: f64,
    pub std_wi: f64,
}

fn codon_weights(
    sequence: &str,
    weights: &RelativeAdaptiveness,
) -> Result<(Vec<String>, Vec<f64>), OptimizerError> {
    check_codon_length(sequence)?;
    let codons = split_codons(sequence);
    let wi_values = codons
        .iter()
        .enumerate()
        .map(|(position, codon)| {
            weights
                .weight(codon)
                .ok_or_else(|| OptimizerError::UnknownCodon {
                    codon: codon.clone(),
                    position,
                })
        })
        .collect::<Result<Vec<f64>, _>>()?;
    Ok((codons, wi_values))
}

/// Scores a sequence, leaving out the first and last codon.
pub fn score(sequence: &str, weights: &RelativeAdaptiveness) -> Result<CaiScore, OptimizerError> {
    if sequence.len() < MIN_SCORED_CODONS * 3 {
        check_codon_length(sequence)?;
        return Err(OptimizerError::SequenceTooShort {
            codons: sequence.len() / 3,
        });
    }
    let (codons, wi_values) = codon_weights(sequence, weights)?;
    let scored = &wi_values[1..wi_values.len() - 1];
    let cai = if scored.is_empty() {
        0.0
    } else {
        let log_sum: f64 = scored.iter().map(|w| w.ln()).sum();
        (log_sum / scored.len() as f64).exp()
    };
    Ok(CaiScore {
        cai,
        codon_count: codons.len(),
        wi_values,
        codons,
    })
}

pub fn stats(
    sequence: &str,
    weights: &RelativeAdaptiveness,
) -> Result<SequenceStats, OptimizerError> {
    let (codons, wi_values) = codon_weights(sequence, weights)?;
    let n = wi_values.len() as f64;
    let mean_wi = wi_values.iter().sum::<f64>() / n;
    let variance = wi_values
        .iter()
        .map(|w| (w - mean_wi).powi(2))
        .sum::<f64>()
        / n;
    Ok(SequenceStats {
        total_codons: codons.len(),
        gc_content: gc_fraction(sequence.as_bytes()),
        mean_wi,
        std_wi: variance.sqrt(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adaptiveness::tests::leucine_table;
    use crate::codon_usage::{CodonUsageCatalog, DEFAULT_ORGANISM};

    fn leucine_weights() -> RelativeAdaptiveness {
        RelativeAdaptiveness::from_table(&leucine_table())
    }

    #[test]
    fn test_leucine_example() {
        let score = score("ATGCTGCTCCTTTAA", &leucine_weights()).unwrap();
        assert_eq!(score.codon_count, 5);
        assert_eq!(score.codons, vec!["ATG", "CTG", "CTC", "CTT", "TAA"]);
        assert_eq!(score.wi_values.len(), 5);
        let expected = ((1.0_f64.ln() + 0.2_f64.ln() + 0.16_f64.ln()) / 3.0).exp();
        assert!((score.cai - expected).abs() < 1e-12);
        assert!((score.cai - 0.318).abs() < 1e-3);
    }

    #[test]
    fn test_lowercase_input() {
        let w = leucine_weights();
        assert_eq!(
            score("atgctgctccttTAA", &w).unwrap().cai,
            score("ATGCTGCTCCTTTAA", &w).unwrap().cai
        );
    }

    #[test]
    fn test_two_codons_score_zero() {
        let score = score("ATGTAA", &leucine_weights()).unwrap();
        assert_eq!(score.cai, 0.0);
        assert_eq!(score.wi_values, vec![1.0, 1.0]);
    }

    #[test]
    fn test_validation() {
        let w = leucine_weights();
        assert_eq!(
            score("ATG", &w),
            Err(OptimizerError::SequenceTooShort { codons: 1 })
        );
        assert_eq!(
            score("ATGCT", &w),
            Err(OptimizerError::InvalidLength { length: 5 })
        );
        assert_eq!(
            score("ATGCTGCTNTAA", &w),
            Err(OptimizerError::UnknownCodon {
                codon: "CTN".to_string(),
                position: 2
            })
        );
    }

    #[test]
    fn test_non_ascii_is_an_unknown_codon() {
        let w = leucine_weights();
        assert_eq!(
            score("AAéAAAAA", &w),
            Err(OptimizerError::UnknownCodon {
                codon: "AA\u{FFFD}".to_string(),
                position: 0
            })
        );
        assert!(matches!(
            stats("ATGCé", &w),
            Err(OptimizerError::UnknownCodon { position: 1, .. })
        ));
    }

    #[test]
    fn test_cai_bounds_and_determinism() {
        let catalog = CodonUsageCatalog::default();
        let w = RelativeAdaptiveness::from_table(catalog.get(DEFAULT_ORGANISM).unwrap());
        let sequence = "ATGAAAGCGCTAATAGGTCTCAGGTGA";
        let first = score(sequence, &w).unwrap();
        let second = score(sequence, &w).unwrap();
        assert_eq!(first, second);
        assert!(first.cai > 0.0 && first.cai <= 1.0);
    }

    #[test]
    fn test_stats() {
        let stats = stats("ATGCTGCTCCTTTAA", &leucine_weights()).unwrap();
        assert_eq!(stats.total_codons, 5);
        assert!((stats.gc_content - 6.0 / 15.0).abs() < 1e-12);
        let mean = (1.0 + 1.0 + 0.2 + 0.16 + 1.0) / 5.0;
        assert!((stats.mean_wi - mean).abs() < 1e-12);
        assert!(stats.std_wi > 0.0);
    }
}
