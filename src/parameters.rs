//! Iteration bounds and thresholds for every search the optimizer runs.

use crate::gc_contents::GcBand;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteRemovalParameters {
    pub max_iterations: usize,
    /// Widest site window, in codons, that gets the multi-codon search.
    pub combinatorial_window_codons: usize,
    pub max_combinations: usize,
    pub alternatives_per_position: usize,
}

impl Default for SiteRemovalParameters {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            combinatorial_window_codons: 3,
            max_combinations: 50,
            alternatives_per_position: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminatorParameters {
    pub max_iterations: usize,
    pub min_tail_length: usize,
    pub min_upstream: usize,
    pub max_upstream: usize,
    pub min_stem: usize,
    pub max_stem: usize,
    pub min_loop: usize,
    pub max_loop: usize,
    pub min_match_ratio: f64,
    pub min_gc_pair_ratio: f64,
    /// kcal/mol; a hairpin must be strictly below this.
    pub max_free_energy: f64,
    pub gc_pair_energy: f64,
    pub other_pair_energy: f64,
}

impl Default for TerminatorParameters {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            min_tail_length: 4,
            min_upstream: 10,
            max_upstream: 60,
            min_stem: 7,
            max_stem: 20,
            min_loop: 3,
            max_loop: 10,
            min_match_ratio: 0.70,
            min_gc_pair_ratio: 0.50,
            max_free_energy: -10.0,
            gc_pair_energy: -3.0,
            other_pair_energy: -2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndBalanceParameters {
    pub max_iterations: usize,
    pub target: GcBand,
}

impl Default for EndBalanceParameters {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            target: GcBand::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerParameters {
    pub site_removal: SiteRemovalParameters,
    pub terminators: TerminatorParameters,
    pub end_balance: EndBalanceParameters,
}

impl OptimizerParameters {
    pub fn from_json_text(json_text: &str) -> Result<Self> {
        serde_json::from_str(json_text).map_err(|e| anyhow!("Invalid optimizer parameters: {e}"))
    }

    pub fn load_from_path(path: &str) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| anyhow!("Could not read parameter file '{path}': {e}"))?;
        Self::from_json_text(&text)
    }
}
