use crate::{codon_usage::CodonUsageTable, genetic_code::STOP};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Weight used in place of an exact zero so that ln(w) stays finite.
pub const ZERO_WEIGHT_FLOOR: f64 = 0.001;

/// Amino acids whose codons always score 1.0.
const SINGLE_FUNCTION_GROUPS: [char; 3] = ['M', 'W', STOP];

/// Relative adaptiveness (w_i) of every codon in a usage table.
#[derive(Clone, Debug, Serialize)]
pub struct RelativeAdaptiveness {
    weights: HashMap<String, f64>,
    groups: BTreeMap<char, Vec<String>>,
}

impl RelativeAdaptiveness {
    pub fn from_table(table: &CodonUsageTable) -> Self {
        let mut weights = HashMap::new();
        for (amino_acid, codons) in table.amino_acid_groups() {
            let frequencies: Vec<f64> = codons
                .iter()
                .map(|c| table.get(c).map_or(0.0, |info| info.frequency))
                .collect();
            let max = frequencies.iter().copied().fold(0.0_f64, f64::max);
            for (codon, frequency) in codons.iter().zip(frequencies) {
                let w = if SINGLE_FUNCTION_GROUPS.contains(amino_acid) {
                    1.0
                } else if max > 0.0 {
                    frequency / max
                } else {
                    0.0
                };
                let w = if w == 0.0 { ZERO_WEIGHT_FLOOR } else { w };
                weights.insert(codon.clone(), w);
            }
        }
        Self {
            weights,
            groups: table.amino_acid_groups().clone(),
        }
    }

    #[inline(always)]
    pub fn weight(&self, codon: &str) -> Option<f64> {
        self.weights.get(codon).copied()
    }

    /// Codons of an amino acid in table order.
    pub fn synonyms(&self, amino_acid: char) -> &[String] {
        self.groups
            .get(&amino_acid)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Synonyms sorted by w_i, highest first; equal weights keep table order.
    pub fn ranked_synonyms(&self, amino_acid: char) -> Vec<&str> {
        let mut ranked: Vec<&str> = self
            .synonyms(amino_acid)
            .iter()
            .map(|c| c.as_str())
            .collect();
        ranked.sort_by(|a, b| {
            self.weight(b)
                .unwrap_or(0.0)
                .total_cmp(&self.weight(a).unwrap_or(0.0))
        });
        ranked
    }

    /// Highest-w_i codon, the first one in table order on ties.
    pub fn best_codon(&self, amino_acid: char) -> Option<&str> {
        let mut best: Option<(&str, f64)> = None;
        for codon in self.synonyms(amino_acid) {
            let w = self.weight(codon).unwrap_or(0.0);
            if best.is_none_or(|(_, best_w)| w > best_w) {
                best = Some((codon, w));
            }
        }
        best.map(|(codon, _)| codon)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}
