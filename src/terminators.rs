//! Rho-independent terminator heuristics: a poly-T tail preceded by a GC-rich hairpin.

use crate::{
    adaptiveness::RelativeAdaptiveness,
    error::OptimizerError,
    genetic_code::{check_translation, CODON_LENGTH},
    iupac_code::IupacCode,
    parameters::TerminatorParameters,
    restriction_sites::substitute,
};
use serde::Serialize;
use std::{collections::HashSet, ops::Range};
use tracing::{debug, info};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Terminator {
    /// Start of the 5' stem arm.
    pub position: usize,
    /// Exclusive end of the tail.
    pub end: usize,
    pub stem_length: usize,
    pub loop_length: usize,
    pub tail_start: usize,
    pub tail_length: usize,
    pub match_ratio: f64,
    pub gc_pair_ratio: f64,
    /// kcal/mol
    pub free_energy: f64,
}

impl Terminator {
    fn stem_region(&self) -> Range<usize> {
        self.position..self.position + 2 * self.stem_length + self.loop_length
    }

    fn tail(&self) -> Range<usize> {
        self.tail_start..self.end
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Hairpin {
    offset: usize,
    stem_length: usize,
    loop_length: usize,
    matches: usize,
    gc_pairs: usize,
}

fn is_t(base: u8) -> bool {
    matches!(base.to_ascii_uppercase(), b'T' | b'U')
}

/// Maximal T/U runs of at least `min_length`, as ranges.
fn t_runs(sequence: &[u8], min_length: usize) -> Vec<Range<usize>> {
    let mut ret = vec![];
    let mut start = None;
    for (i, base) in sequence.iter().enumerate() {
        match (is_t(*base), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                if i - s >= min_length {
                    ret.push(s..i);
                }
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        if sequence.len() - s >= min_length {
            ret.push(s..sequence.len());
        }
    }
    ret
}

fn pairs(a: u8, b: u8) -> bool {
    IupacCode::letter_complement(a) == b.to_ascii_uppercase()
}

/// First stem-loop in `region` passing both ratio thresholds.
fn find_hairpin(region: &[u8], params: &TerminatorParameters) -> Option<Hairpin> {
    for stem_length in params.min_stem..=params.max_stem {
        for loop_length in params.min_loop..=params.max_loop {
            let span = 2 * stem_length + loop_length;
            if span > region.len() {
                continue;
            }
            for offset in 0..=region.len() - span {
                let mut matches = 0;
                let mut gc_pairs = 0;
                for i in 0..stem_length {
                    let left = region[offset + i];
                    let right = region[offset + span - 1 - i];
                    if pairs(left, right) {
                        matches += 1;
                        if IupacCode::is_gc(left) {
                            gc_pairs += 1;
                        }
                    }
                }
                let match_ratio = matches as f64 / stem_length as f64;
                let gc_pair_ratio = gc_pairs as f64 / stem_length as f64;
                if match_ratio >= params.min_match_ratio && gc_pair_ratio >= params.min_gc_pair_ratio {
                    return Some(Hairpin {
                        offset,
                        stem_length,
                        loop_length,
                        matches,
                        gc_pairs,
                    });
                }
            }
        }
    }
    None
}

pub fn detect_terminators(sequence: &str, params: &TerminatorParameters) -> Vec<Terminator> {
    let bytes = sequence.as_bytes();
    t_runs(bytes, params.min_tail_length)
        .into_iter()
        .filter_map(|tail| {
            let region_start = tail.start.saturating_sub(params.max_upstream);
            let region = &bytes[region_start..tail.start];
            if region.len() < params.min_upstream {
                return None;
            }
            let hairpin = find_hairpin(region, params)?;
            let free_energy = hairpin.gc_pairs as f64 * params.gc_pair_energy
                + (hairpin.matches - hairpin.gc_pairs) as f64 * params.other_pair_energy;
            if free_energy >= params.max_free_energy {
                return None;
            }
            Some(Terminator {
                position: region_start + hairpin.offset,
                end: tail.end,
                stem_length: hairpin.stem_length,
                loop_length: hairpin.loop_length,
                tail_start: tail.start,
                tail_length: tail.len(),
                match_ratio: hairpin.matches as f64 / hairpin.stem_length as f64,
                gc_pair_ratio: hairpin.gc_pairs as f64 / hairpin.stem_length as f64,
                free_energy,
            })
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub enum TerminatorSearchOutcome {
    Clean { sequence: String },
    Removed {
        sequence: String,
        substitutions: usize,
    },
    Blocked {
        sequence: String,
        terminator: Terminator,
    },
    Exhausted {
        sequence: String,
        iterations: usize,
        remaining: usize,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TerminatorRemoval {
    pub sequence: String,
    pub found: usize,
    pub substitutions: usize,
}

fn codon_span(range: &Range<usize>, codon_count: usize) -> Range<usize> {
    let first = range.start / CODON_LENGTH;
    let last = ((range.end - 1) / CODON_LENGTH).min(codon_count - 1);
    first..last + 1
}

fn count_t(codon: &str) -> usize {
    codon.bytes().filter(|b| is_t(*b)).count()
}

fn has_t_run(sequence: &str, range: &Range<usize>, min_length: usize) -> bool {
    !t_runs(&sequence.as_bytes()[range.clone()], min_length).is_empty()
}

/// Swaps tail codons for T-poorer synonyms until the tail breaks up. Returns the number of swaps.
fn shorten_tail(
    sequence: &mut String,
    protein: &[u8],
    weights: &RelativeAdaptiveness,
    terminator: &Terminator,
    params: &TerminatorParameters,
) -> usize {
    let tail = terminator.tail();
    let mut changed = 0;
    for codon_index in codon_span(&tail, protein.len()) {
        let current = sequence[codon_index * CODON_LENGTH..(codon_index + 1) * CODON_LENGTH].to_string();
        let replacement = weights
            .ranked_synonyms(protein[codon_index] as char)
            .into_iter()
            .find(|alt| count_t(alt) < count_t(&current));
        if let Some(alt) = replacement {
            *sequence = substitute(sequence, codon_index, alt);
            changed += 1;
            if !has_t_run(sequence, &tail, params.min_tail_length) {
                break;
            }
        }
    }
    changed
}

/// Gives the first untouched stem codon its second-best synonym.
///
/// Codons already holding the runner-up, and codons changed by an earlier call, are
/// skipped, so repeated calls walk along the stem instead of undoing each other.
fn disrupt_stem(
    sequence: &mut String,
    protein: &[u8],
    weights: &RelativeAdaptiveness,
    terminator: &Terminator,
    touched: &mut HashSet<usize>,
) -> bool {
    for codon_index in codon_span(&terminator.stem_region(), protein.len()) {
        if touched.contains(&codon_index) {
            continue;
        }
        let current = &sequence[codon_index * CODON_LENGTH..(codon_index + 1) * CODON_LENGTH];
        let Some(runner_up) = weights
            .ranked_synonyms(protein[codon_index] as char)
            .get(1)
            .copied()
        else {
            continue;
        };
        if runner_up == current {
            continue;
        }
        *sequence = substitute(sequence, codon_index, runner_up);
        touched.insert(codon_index);
        return true;
    }
    false
}

/// Runs the bounded removal loop and reports how it ended.
///
/// `sequence` must translate to `protein`.
pub fn search_terminator_removal(
    sequence: &str,
    protein: &str,
    weights: &RelativeAdaptiveness,
    params: &TerminatorParameters,
) -> Result<TerminatorSearchOutcome, OptimizerError> {
    check_translation(sequence, protein)?;
    let protein = protein.as_bytes();
    let mut sequence = sequence.to_string();
    let mut substitutions = 0;
    let mut touched = HashSet::new();
    for iteration in 0..params.max_iterations {
        let Some(terminator) = detect_terminators(&sequence, params).into_iter().next() else {
            return Ok(if substitutions == 0 {
                TerminatorSearchOutcome::Clean { sequence }
            } else {
                TerminatorSearchOutcome::Removed {
                    sequence,
                    substitutions,
                }
            });
        };
        debug!(
            iteration,
            position = terminator.position,
            tail_start = terminator.tail_start,
            "removing terminator"
        );
        let changed = shorten_tail(&mut sequence, protein, weights, &terminator, params);
        if changed > 0 {
            substitutions += changed;
            continue;
        }
        if disrupt_stem(&mut sequence, protein, weights, &terminator, &mut touched) {
            substitutions += 1;
            continue;
        }
        return Ok(TerminatorSearchOutcome::Blocked {
            sequence,
            terminator,
        });
    }
    let remaining = detect_terminators(&sequence, params).len();
    Ok(if remaining == 0 {
        TerminatorSearchOutcome::Removed {
            sequence,
            substitutions,
        }
    } else {
        TerminatorSearchOutcome::Exhausted {
            sequence,
            iterations: params.max_iterations,
            remaining,
        }
    })
}

pub fn remove_terminators(
    sequence: &str,
    protein: &str,
    weights: &RelativeAdaptiveness,
    params: &TerminatorParameters,
) -> Result<TerminatorRemoval, OptimizerError> {
    let found = detect_terminators(sequence, params).len();
    let (sequence, substitutions) = match search_terminator_removal(sequence, protein, weights, params)?
    {
        TerminatorSearchOutcome::Clean { sequence } => (sequence, 0),
        TerminatorSearchOutcome::Removed {
            sequence,
            substitutions,
        } => (sequence, substitutions),
        TerminatorSearchOutcome::Blocked { terminator, .. } => {
            return Err(OptimizerError::TerminatorNotRemovable {
                position: terminator.position,
            });
        }
        TerminatorSearchOutcome::Exhausted {
            iterations,
            remaining,
            ..
        } => {
            return Err(OptimizerError::TerminatorRemovalExhausted {
                iterations,
                remaining,
            });
        }
    };
    check_translation(&sequence, protein)?;
    info!(found, substitutions, "terminator removal finished");
    Ok(TerminatorRemoval {
        sequence,
        found,
        substitutions,
    })
}
