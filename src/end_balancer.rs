//! Pulls the GC content of the 5' and 3' ends into a band suitable for primer design.

use crate::{
    adaptiveness::RelativeAdaptiveness,
    error::OptimizerError,
    gc_contents::{gc_count, gc_fraction},
    genetic_code::{check_translation, CODON_LENGTH},
    parameters::EndBalanceParameters,
    restriction_sites::substitute,
};
use serde::Serialize;
use std::ops::Range;
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EndWindow {
    /// Nucleotide range of the window.
    pub start: usize,
    pub end: usize,
    pub gc_before: f64,
    pub gc_after: f64,
    pub substitutions: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EndBalance {
    pub sequence: String,
    pub leading: EndWindow,
    pub trailing: EndWindow,
}

impl EndBalance {
    pub fn substitutions(&self) -> usize {
        self.leading.substitutions + self.trailing.substitutions
    }
}

/// Number of codons in each end window, never below one.
pub fn window_codons(sequence_length: usize, end_length: usize) -> usize {
    (end_length.min(sequence_length / 2) / CODON_LENGTH).max(1)
}

fn nucleotides(codons: &Range<usize>) -> Range<usize> {
    codons.start * CODON_LENGTH..codons.end * CODON_LENGTH
}

/// Highest-scoring synonym swap that moves the window closer to the band.
fn best_step(
    sequence: &str,
    protein: &[u8],
    weights: &RelativeAdaptiveness,
    codons: &Range<usize>,
    params: &EndBalanceParameters,
) -> Option<String> {
    let window = nucleotides(codons);
    let gc = gc_fraction(&sequence.as_bytes()[window.clone()]);
    let distance = params.target.distance(gc);
    let raise = gc < params.target.min;
    let mut best: Option<(String, f64)> = None;
    for codon_index in codons.clone() {
        let current = &sequence[codon_index * CODON_LENGTH..(codon_index + 1) * CODON_LENGTH];
        let current_gc = gc_count(current.as_bytes()) as isize;
        for alternative in weights.synonyms(protein[codon_index] as char) {
            if alternative == current {
                continue;
            }
            let delta = gc_count(alternative.as_bytes()) as isize - current_gc;
            let favorable = if raise { delta } else { -delta };
            if favorable <= 0 {
                continue;
            }
            let candidate = substitute(sequence, codon_index, alternative);
            let candidate_gc = gc_fraction(&candidate.as_bytes()[window.clone()]);
            if params.target.distance(candidate_gc) >= distance {
                continue;
            }
            let score = favorable as f64 * weights.weight(alternative).unwrap_or(0.0);
            if best.as_ref().is_none_or(|(_, best_score)| score > *best_score) {
                best = Some((candidate, score));
            }
        }
    }
    best.map(|(candidate, _)| candidate)
}

fn balance_window(
    sequence: &mut String,
    protein: &[u8],
    weights: &RelativeAdaptiveness,
    codons: Range<usize>,
    params: &EndBalanceParameters,
) -> EndWindow {
    let window = nucleotides(&codons);
    let gc_before = gc_fraction(&sequence.as_bytes()[window.clone()]);
    let mut substitutions = 0;
    for _ in 0..params.max_iterations {
        if params.target.contains(gc_fraction(&sequence.as_bytes()[window.clone()])) {
            break;
        }
        match best_step(sequence, protein, weights, &codons, params) {
            Some(candidate) => {
                *sequence = candidate;
                substitutions += 1;
            }
            None => break,
        }
    }
    let gc_after = gc_fraction(&sequence.as_bytes()[window.clone()]);
    debug!(
        start = window.start,
        end = window.end,
        gc_before,
        gc_after,
        substitutions,
        "balanced end window"
    );
    EndWindow {
        start: window.start,
        end: window.end,
        gc_before,
        gc_after,
        substitutions,
    }
}

/// `sequence` must translate to `protein`.
pub fn balance_ends(
    sequence: &str,
    protein: &str,
    weights: &RelativeAdaptiveness,
    end_length: usize,
    params: &EndBalanceParameters,
) -> Result<EndBalance, OptimizerError> {
    check_translation(sequence, protein)?;
    let codon_count = sequence.len() / CODON_LENGTH;
    let size = window_codons(sequence.len(), end_length).min(codon_count);
    let protein_bytes = protein.as_bytes();
    let mut balanced = sequence.to_string();
    let leading = balance_window(&mut balanced, protein_bytes, weights, 0..size, params);
    let trailing = balance_window(
        &mut balanced,
        protein_bytes,
        weights,
        codon_count - size..codon_count,
        params,
    );
    check_translation(&balanced, protein)?;
    Ok(EndBalance {
        sequence: balanced,
        leading,
        trailing,
    })
}
