//! Restriction site scanning and synonymous-codon site removal.

use crate::{
    adaptiveness::RelativeAdaptiveness,
    cai,
    enzymes::RestrictionData,
    error::OptimizerError,
    genetic_code::{check_translation, CODON_LENGTH},
    parameters::SiteRemovalParameters,
    restriction_enzyme::{find_motif, motif_at, RestrictionSite, Strand},
};
use itertools::Itertools;
use serde::Serialize;
use std::ops::RangeInclusive;
use tracing::{debug, info};

/// Every literal site in `sequence`, sorted by position and unique per (position, motif).
///
/// With a filter only the named enzymes are scanned; without one the whole registry
/// and its simplified motifs are.
pub fn find_sites(
    sequence: &str,
    registry: &RestrictionData,
    filter: Option<&[String]>,
) -> Vec<RestrictionSite> {
    let bytes = sequence.as_bytes();
    let mut sites: Vec<RestrictionSite> = match filter {
        Some(names) => registry
            .restriction_enzymes_by_name(names)
            .into_iter()
            .flat_map(|re| re.get_sites(bytes))
            .collect(),
        None => registry
            .restriction_enzymes()
            .iter()
            .flat_map(|re| re.get_sites(bytes))
            .collect(),
    };
    if filter.is_none() {
        for motif in registry.simplified_motifs() {
            let enzyme = registry.enzyme_for_motif(motif).unwrap_or(motif);
            sites.extend(
                find_motif(bytes, motif.as_bytes())
                    .into_iter()
                    .map(|position| RestrictionSite {
                        enzyme: enzyme.to_string(),
                        motif: motif.clone(),
                        position,
                        end: position + motif.len(),
                        strand: Strand::Forward,
                    }),
            );
        }
    }
    sites.sort_by(|a, b| (a.position, &a.motif).cmp(&(b.position, &b.motif)));
    sites.dedup_by(|a, b| a.position == b.position && a.motif == b.motif);
    sites
}

#[derive(Clone, Debug, PartialEq)]
pub enum SiteSearchOutcome {
    /// No site was present to begin with.
    Clean { sequence: String },
    Removed {
        sequence: String,
        removed: Vec<RestrictionSite>,
    },
    /// No synonymous substitution eliminates `site`.
    Blocked {
        sequence: String,
        site: RestrictionSite,
    },
    Exhausted {
        sequence: String,
        iterations: usize,
        remaining: usize,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SiteRemoval {
    pub sequence: String,
    pub found: usize,
    pub removed: Vec<RestrictionSite>,
}

struct SiteContext<'a> {
    protein: &'a [u8],
    weights: &'a RelativeAdaptiveness,
}

impl SiteContext<'_> {
    fn eliminates(&self, candidate: &str, target: &RestrictionSite) -> bool {
        !motif_at(candidate.as_bytes(), target.motif.as_bytes(), target.position)
    }

    fn amino_acid(&self, codon_index: usize) -> char {
        self.protein[codon_index] as char
    }
}

fn codon_at(sequence: &str, codon_index: usize) -> &str {
    &sequence[codon_index * CODON_LENGTH..(codon_index + 1) * CODON_LENGTH]
}

pub(crate) fn substitute(sequence: &str, codon_index: usize, codon: &str) -> String {
    let mut ret = sequence.to_string();
    ret.replace_range(
        codon_index * CODON_LENGTH..(codon_index + 1) * CODON_LENGTH,
        codon,
    );
    ret
}

fn codon_window(site: &RestrictionSite, codon_count: usize) -> RangeInclusive<usize> {
    let first = site.position / CODON_LENGTH;
    let last = ((site.end - 1) / CODON_LENGTH).min(codon_count - 1);
    first..=last
}

/// Single-codon substitution with the highest resulting CAI; earlier candidates win ties.
fn best_single_substitution(
    ctx: &SiteContext,
    sequence: &str,
    window: RangeInclusive<usize>,
    target: &RestrictionSite,
) -> Result<Option<String>, OptimizerError> {
    let mut best: Option<(String, f64)> = None;
    for codon_index in window {
        let current = codon_at(sequence, codon_index);
        for alternative in ctx.weights.synonyms(ctx.amino_acid(codon_index)) {
            if alternative == current {
                continue;
            }
            let candidate = substitute(sequence, codon_index, alternative);
            if !ctx.eliminates(&candidate, target) {
                continue;
            }
            let score = cai::score(&candidate, ctx.weights)?.cai;
            if best.as_ref().is_none_or(|(_, best_score)| score > *best_score) {
                best = Some((candidate, score));
            }
        }
    }
    Ok(best.map(|(candidate, _)| candidate))
}

/// First multi-codon combination, from the top-ranked alternatives, that removes the target.
fn combinatorial_substitution(
    ctx: &SiteContext,
    sequence: &str,
    window: RangeInclusive<usize>,
    target: &RestrictionSite,
    params: &SiteRemovalParameters,
) -> Option<String> {
    let first = *window.start();
    let current: Vec<&str> = window.clone().map(|i| codon_at(sequence, i)).collect();
    let options: Vec<Vec<&str>> = window
        .clone()
        .zip(&current)
        .map(|(codon_index, current)| {
            let mut ret = vec![*current];
            ret.extend(
                ctx.weights
                    .ranked_synonyms(ctx.amino_acid(codon_index))
                    .into_iter()
                    .filter(|c| c != current)
                    .take(params.alternatives_per_position),
            );
            ret
        })
        .collect();
    options
        .into_iter()
        .map(|o| o.into_iter())
        .multi_cartesian_product()
        .filter(|combo| combo.iter().zip(&current).filter(|(a, b)| a != b).count() >= 2)
        .take(params.max_combinations)
        .map(|combo| {
            combo
                .iter()
                .enumerate()
                .fold(sequence.to_string(), |seq, (offset, codon)| {
                    substitute(&seq, first + offset, codon)
                })
        })
        .find(|candidate| ctx.eliminates(candidate, target))
}

/// Runs the bounded removal loop and reports how it ended.
///
/// `sequence` must translate to `protein`.
pub fn search_site_removal(
    sequence: &str,
    protein: &str,
    weights: &RelativeAdaptiveness,
    registry: &RestrictionData,
    filter: Option<&[String]>,
    params: &SiteRemovalParameters,
) -> Result<SiteSearchOutcome, OptimizerError> {
    check_translation(sequence, protein)?;
    let ctx = SiteContext {
        protein: protein.as_bytes(),
        weights,
    };
    let codon_count = sequence.len() / CODON_LENGTH;
    let mut sequence = sequence.to_string();
    let mut removed = vec![];
    for iteration in 0..params.max_iterations {
        let sites = find_sites(&sequence, registry, filter);
        let Some(target) = sites.first().cloned() else {
            return Ok(if removed.is_empty() {
                SiteSearchOutcome::Clean { sequence }
            } else {
                SiteSearchOutcome::Removed { sequence, removed }
            });
        };
        let window = codon_window(&target, codon_count);
        debug!(
            iteration,
            enzyme = target.enzyme.as_str(),
            position = target.position,
            remaining = sites.len(),
            "removing restriction site"
        );
        let replacement = match best_single_substitution(&ctx, &sequence, window.clone(), &target)? {
            Some(candidate) => Some(candidate),
            None if window.clone().count() <= params.combinatorial_window_codons => {
                combinatorial_substitution(&ctx, &sequence, window, &target, params)
            }
            None => None,
        };
        match replacement {
            Some(candidate) => {
                sequence = candidate;
                removed.push(target);
            }
            None => {
                return Ok(SiteSearchOutcome::Blocked {
                    sequence,
                    site: target,
                });
            }
        }
    }
    let remaining = find_sites(&sequence, registry, filter).len();
    Ok(match (remaining, removed.is_empty()) {
        (0, true) => SiteSearchOutcome::Clean { sequence },
        (0, false) => SiteSearchOutcome::Removed { sequence, removed },
        _ => SiteSearchOutcome::Exhausted {
            sequence,
            iterations: params.max_iterations,
            remaining,
        },
    })
}

/// Removes every site, failing with the offending site or when the budget runs out.
pub fn remove_sites(
    sequence: &str,
    protein: &str,
    weights: &RelativeAdaptiveness,
    registry: &RestrictionData,
    filter: Option<&[String]>,
    params: &SiteRemovalParameters,
) -> Result<SiteRemoval, OptimizerError> {
    let found = find_sites(sequence, registry, filter).len();
    let (sequence, removed) =
        match search_site_removal(sequence, protein, weights, registry, filter, params)? {
            SiteSearchOutcome::Clean { sequence } => (sequence, vec![]),
            SiteSearchOutcome::Removed { sequence, removed } => (sequence, removed),
            SiteSearchOutcome::Blocked { site, .. } => {
                return Err(OptimizerError::SiteNotRemovable {
                    enzyme: site.enzyme,
                    motif: site.motif,
                    position: site.position,
                });
            }
            SiteSearchOutcome::Exhausted {
                iterations,
                remaining,
                ..
            } => {
                return Err(OptimizerError::SiteRemovalExhausted {
                    iterations,
                    remaining,
                });
            }
        };
    check_translation(&sequence, protein)?;
    info!(found, removed = removed.len(), "restriction site removal finished");
    Ok(SiteRemoval {
        sequence,
        found,
        removed,
    })
}
